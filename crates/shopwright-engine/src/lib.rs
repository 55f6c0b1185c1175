pub mod config;
pub mod convergence;
pub mod executor;
pub mod flows;
pub mod generator;
pub mod hints;
pub mod intent;
pub mod page;
pub mod scorer;

pub use convergence::{ConvergenceLoop, ConvergenceReport, ConvergenceState, DismissStrategy};
pub use executor::{Resolver, ResolverSettings};
pub use generator::CandidateGenerator;
pub use page::{ElementRef, Interaction, Page};
pub use shopwright_common as common;
