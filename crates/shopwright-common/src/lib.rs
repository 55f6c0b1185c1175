pub mod candidate;
pub mod error;
pub mod hint;
pub mod intent;
pub mod outcome;
pub mod snapshot;

pub use candidate::{Candidate, CandidateSource, Locator, MatchType};
pub use error::{HintError, PageError, ResolveError};
pub use hint::{Confidence, Hint, HintTarget, Point};
pub use intent::{Action, Attribute, AttributeKind, Intent};
pub use outcome::{Attempt, AttemptOutcome, MatchCandidate, ResolutionResult};
pub use snapshot::{FormInfo, FormInput, InteractiveElement, PageSnapshot, Rect};
