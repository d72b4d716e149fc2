pub mod linear_svm;
#[cfg(feature = "svm")]
pub mod svm;

pub mod classifier_trait;
pub mod factory;

pub use classifier_trait::ClassifierModel;
