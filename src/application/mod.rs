pub mod use_cases;

pub use use_cases::analysis::AnalyzeUseCase;
pub use use_cases::library::LibraryUseCase;
pub use use_cases::profile::ProfileUseCase;
pub use use_cases::upload::UploadUseCase;
