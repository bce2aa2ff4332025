// Topic modeling: preprocessing, bag-of-words vectorization, LDA inference,
// keyword extraction and model persistence.

pub mod lda;
pub mod lemma;
pub mod modeler;
pub mod persist;
pub mod preprocess;
pub mod traits;
pub mod types;
pub mod vectorizer;
