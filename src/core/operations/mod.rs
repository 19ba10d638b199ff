mod file_ops;

pub use file_ops::{move_file, FileOpError, FileOpResult};
