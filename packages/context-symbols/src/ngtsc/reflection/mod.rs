pub mod src;

pub use src::classifier::{Classification, ClassificationCache, DeclarationClassifier};
pub use src::host::{Declaration, Import, ReflectionHost, ResolvedIdentifier};
pub use src::program_host::ProgramReflectionHost;
