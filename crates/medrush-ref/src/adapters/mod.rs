//! Concrete collaborator implementations.

pub mod call_out;
pub mod fixture;
pub mod gemini;
pub mod identity;
pub mod voice;

pub use call_out::LoggingCallOut;
pub use fixture::FixtureExtractionProvider;
pub use gemini::GeminiExtractionProvider;
pub use identity::DummyOtpIdentity;
pub use voice::{ConsoleVoice, FailingVoice, RecordingVoice};
