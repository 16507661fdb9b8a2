/// Small internal helpers shared by resource types

pub mod slot_table;

pub use slot_table::TargetSlotTable;
