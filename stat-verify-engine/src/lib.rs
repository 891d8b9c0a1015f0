//! Dispatch and verification engine for named statistical tests.
//!
//! A [`TestRegistry`] binds each test identifier to the input shape it needs,
//! the result fields it produces and the computation provider that runs it.
//! [`TestEngine`] validates raw input against that shape, runs the provider and
//! normalizes its output; [`compare`] checks a result against a reference
//! fixture under an absolute tolerance.

pub mod batch;
pub mod bindings;
pub mod catalog;
pub mod comparator;
pub mod executor;
pub mod fixtures;
pub mod normalize;
pub mod registry;
pub mod validator;
pub mod verification;

pub use batch::{BatchVerifier, VerificationSummary};
pub use catalog::{names, CatalogEntry, STANDARD_CATALOG};
pub use comparator::{compare, compare_values};
pub use executor::TestEngine;
pub use fixtures::{Fixture, FixtureTable};
pub use normalize::Normalize;
pub use registry::{RegistryEntry, TestRegistry};
pub use validator::{InputValidator, DATA_FIELD};
pub use verification::{verify_fixture, VerificationReport, VerificationStatus};
