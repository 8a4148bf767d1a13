pub mod instruction_reader;
