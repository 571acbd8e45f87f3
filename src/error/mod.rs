mod cache;
mod io;
mod reader;
mod reflection;

pub use cache::CacheError;
pub use io::IoError;
pub use reader::ReaderError;
pub use reflection::ReflectionError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Reflection(#[from] ReflectionError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Reader(#[from] ReaderError),
}

pub type Result<T> = std::result::Result<T, Error>;
