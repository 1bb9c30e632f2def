pub mod readings;

pub use readings::ReadingRepository;
