//! Machine-dependent records of the Mesa processor used by the emulator.
//!
//! Bit numbers follow the processor documentation: bit 0 is the most
//! significant bit of a word. Bits not named here are reserved.

use crate::{field::Field, record::Record};

static CONDITION_FIELDS: [Field; 3] = [
    Field::bits("tail", 0, 3, 12),
    Field::flag("abortable", 0, 14),
    Field::flag("wakeup", 0, 15),
];

/// Condition variable: queue tail plus the abortable and wakeup flags.
pub static CONDITION: Record = Record::new("Condition", 1, &CONDITION_FIELDS);

static MONITOR_LOCK_FIELDS: [Field; 3] = [
    Field::bits("tail", 0, 3, 12),
    Field::bits("available", 0, 13, 14),
    Field::flag("locked", 0, 15),
];

/// Monitor lock word.
pub static MONITOR_LOCK: Record = Record::new("MonitorLock", 1, &MONITOR_LOCK_FIELDS);

static PSB_LINK_FIELDS: [Field; 5] = [
    Field::bits("priority", 0, 0, 2),
    Field::bits("next", 0, 3, 12),
    Field::flag("failed", 0, 13),
    Field::flag("permanent", 0, 14),
    Field::flag("preempted", 0, 15),
];

pub static PSB_LINK: Record = Record::new("PsbLink", 1, &PSB_LINK_FIELDS);

static PSB_FLAGS_FIELDS: [Field; 4] = [
    Field::bits("available", 0, 0, 2),
    Field::bits("cleanup", 0, 3, 12),
    Field::flag("waiting", 0, 14),
    Field::flag("abort", 0, 15),
];

pub static PSB_FLAGS: Record = Record::new("PsbFlags", 1, &PSB_FLAGS_FIELDS);

static PROCESS_STATE_BLOCK_FIELDS: [Field; 4] = [
    Field::record("link", 0, &PSB_LINK),
    Field::record("flags", 1, &PSB_FLAGS),
    Field::word("context", 2),
    Field::word("timeout", 3),
];

/// Process state block, linked into monitor and condition queues.
pub static PROCESS_STATE_BLOCK: Record =
    Record::new("ProcessStateBlock", 4, &PROCESS_STATE_BLOCK_FIELDS);

static EXTRA_GLOBAL_WORD_FIELDS: [Field; 5] = [
    Field::flag("started", 0, 11),
    Field::flag("copy", 0, 12),
    Field::flag("copied", 0, 13),
    Field::flag("alloced", 0, 14),
    Field::flag("shared", 0, 15),
];

pub static EXTRA_GLOBAL_WORD: Record = Record::new("ExtraGlobalWord", 1, &EXTRA_GLOBAL_WORD_FIELDS);

static GLOBAL_WORD_FIELDS: [Field; 3] = [
    Field::bits("gfi", 0, 0, 13),
    Field::flag("trapxfers", 0, 14),
    Field::flag("codelinks", 0, 15),
];

pub static GLOBAL_WORD: Record = Record::new("GlobalWord", 1, &GLOBAL_WORD_FIELDS);

static GLOBAL_OVERHEAD_FIELDS: [Field; 2] = [
    Field::word("available", 0),
    Field::record("word", 1, &GLOBAL_WORD),
];

/// Two words preceding a global frame.
pub static GLOBAL_OVERHEAD: Record = Record::new("GlobalOverhead", 2, &GLOBAL_OVERHEAD_FIELDS);

/// Every built-in layout, for validating the whole table at startup.
pub static ALL: [&Record; 8] = [
    &CONDITION,
    &MONITOR_LOCK,
    &PSB_LINK,
    &PSB_FLAGS,
    &PROCESS_STATE_BLOCK,
    &EXTRA_GLOBAL_WORD,
    &GLOBAL_WORD,
    &GLOBAL_OVERHEAD,
];
