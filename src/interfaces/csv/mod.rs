pub mod balance_writer;
pub mod instruction_reader;
