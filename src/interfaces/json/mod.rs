pub mod view_writer;
