pub mod providers;
pub mod recommendations;
pub mod retry;

pub use providers::{PosterProvider, TmdbPosterProvider};
pub use recommendations::Recommender;
pub use retry::{HttpTransport, ReqwestTransport, RetryPolicy};
