// Latent Dirichlet Allocation with variational Bayes inference.
//
// The topic-term parameter lambda (k x V) is initialized from Gamma(100, 0.01)
// and refined by alternating an E-step (per-document gamma updates) with an
// M-step that folds the sufficient statistics back into lambda, either once
// per pass over the whole corpus (Batch) or once per mini-batch with a
// decaying step size (Online).
//
// The E-step runs in parallel across documents. Each document's update only
// reads lambda and its own gamma initialization, which is drawn sequentially
// before the parallel section, and sufficient statistics are summed in
// document order afterwards. The result does not depend on the thread count.

use ndarray::{Array1, Array2, Axis};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Gamma};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::function::gamma::digamma;
use tracing::debug;

use super::traits::{FittedTopics, TopicInference};
use super::vectorizer::DocumentTermMatrix;
use crate::error::{Result, TopicError};

/// Shape and scale of the Gamma distribution used for random initialization.
const INIT_GAMMA_SHAPE: f64 = 100.0;
const INIT_GAMMA_SCALE: f64 = 0.01;

/// How lambda is updated from the E-step statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningMethod {
    /// One update per pass over the full corpus
    Batch,
    /// One update per mini-batch, step size (offset + t)^-decay
    #[default]
    Online,
}

impl std::str::FromStr for LearningMethod {
    type Err = TopicError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "batch" => Ok(LearningMethod::Batch),
            "online" => Ok(LearningMethod::Online),
            other => Err(TopicError::InvalidConfiguration(format!(
                "unknown learning method '{other}' (expected 'batch' or 'online')"
            ))),
        }
    }
}

/// Variational LDA hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LdaConfig {
    /// Number of topics (k)
    pub n_topics: usize,
    /// Document-topic prior alpha; 1/k when unset
    pub doc_topic_prior: Option<f64>,
    /// Topic-word prior eta; 1/k when unset
    pub topic_word_prior: Option<f64>,
    pub learning_method: LearningMethod,
    /// Online step size decay (kappa)
    pub learning_decay: f64,
    /// Online step size offset (tau0)
    pub learning_offset: f64,
    /// Documents per online mini-batch
    pub batch_size: usize,
    /// Passes over the corpus
    pub max_iterations: usize,
    /// Cap on gamma updates per document per E-step
    pub max_doc_update_iter: usize,
    /// A document's E-step stops once the mean gamma change drops below this
    pub mean_change_tol: f64,
    pub random_seed: u64,
}

impl Default for LdaConfig {
    fn default() -> Self {
        Self {
            n_topics: 10,
            doc_topic_prior: None,
            topic_word_prior: None,
            learning_method: LearningMethod::Online,
            learning_decay: 0.7,
            learning_offset: 10.0,
            batch_size: 128,
            max_iterations: 10,
            max_doc_update_iter: 100,
            mean_change_tol: 1e-3,
            random_seed: 42,
        }
    }
}

impl LdaConfig {
    pub fn new(n_topics: usize) -> Self {
        Self {
            n_topics,
            ..Default::default()
        }
    }

    pub fn learning_method(mut self, method: LearningMethod) -> Self {
        self.learning_method = method;
        self
    }

    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn batch_size(mut self, n: usize) -> Self {
        self.batch_size = n;
        self
    }

    pub fn doc_topic_prior(mut self, alpha: f64) -> Self {
        self.doc_topic_prior = Some(alpha);
        self
    }

    pub fn topic_word_prior(mut self, eta: f64) -> Self {
        self.topic_word_prior = Some(eta);
        self
    }

    /// Effective alpha.
    pub fn alpha(&self) -> f64 {
        self.doc_topic_prior
            .unwrap_or(1.0 / self.n_topics.max(1) as f64)
    }

    /// Effective eta.
    pub fn eta(&self) -> f64 {
        self.topic_word_prior
            .unwrap_or(1.0 / self.n_topics.max(1) as f64)
    }

    /// Online step size for the `t`-th mini-batch update: (offset + t)^-decay.
    pub fn step_size(&self, t: u64) -> f64 {
        (self.learning_offset + t as f64).powf(-self.learning_decay)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(TopicError::InvalidConfiguration(msg));

        if self.n_topics == 0 {
            return invalid("n_topics must be a positive integer".into());
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations must be a positive integer".into());
        }
        if self.max_doc_update_iter == 0 {
            return invalid("max_doc_update_iter must be a positive integer".into());
        }
        if self.batch_size == 0 {
            return invalid("batch_size must be a positive integer".into());
        }
        if !(self.alpha() > 0.0 && self.alpha().is_finite()) {
            return invalid(format!("doc_topic_prior must be positive, got {}", self.alpha()));
        }
        if !(self.eta() > 0.0 && self.eta().is_finite()) {
            return invalid(format!("topic_word_prior must be positive, got {}", self.eta()));
        }
        if !(self.learning_decay > 0.5 && self.learning_decay <= 1.0) {
            return invalid(format!(
                "learning_decay must be in (0.5, 1.0], got {}",
                self.learning_decay
            ));
        }
        if !(self.learning_offset >= 0.0) {
            return invalid(format!(
                "learning_offset must be non-negative, got {}",
                self.learning_offset
            ));
        }
        if !(self.mean_change_tol >= 0.0) {
            return invalid(format!(
                "mean_change_tol must be non-negative, got {}",
                self.mean_change_tol
            ));
        }
        Ok(())
    }
}

/// Variational Bayes LDA engine.
#[derive(Debug, Clone)]
pub struct VariationalLda {
    config: LdaConfig,
}

/// Output of one document's E-step.
struct DocUpdate {
    gamma: Array1<f64>,
    /// exp(E[log theta]) and (term, count / phi_norm) pairs, when requested
    sstats: Option<(Array1<f64>, Vec<(usize, f64)>)>,
}

impl VariationalLda {
    pub fn new(config: LdaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LdaConfig {
        &self.config
    }

    /// Run the E-step over a slice of rows.
    ///
    /// Returns the unnormalized gamma matrix and, when `with_sstats` is set,
    /// the sufficient statistics already multiplied by exp(E[log beta]).
    fn e_step(
        &self,
        rows: &[Vec<(usize, u32)>],
        exp_elog_beta: &Array2<f64>,
        gamma_init: Vec<Array1<f64>>,
        with_sstats: bool,
    ) -> (Array2<f64>, Option<Array2<f64>>) {
        let k = self.config.n_topics;
        let alpha = self.config.alpha();

        let updates: Vec<DocUpdate> = rows
            .par_iter()
            .zip(gamma_init.into_par_iter())
            .map(|(row, gamma)| {
                update_document(
                    row,
                    exp_elog_beta,
                    gamma,
                    alpha,
                    self.config.max_doc_update_iter,
                    self.config.mean_change_tol,
                    with_sstats,
                )
            })
            .collect();

        let mut gamma = Array2::zeros((rows.len(), k));
        let mut sstats: Option<Array2<f64>> =
            with_sstats.then(|| Array2::zeros(exp_elog_beta.raw_dim()));

        for (doc, update) in updates.into_iter().enumerate() {
            gamma.row_mut(doc).assign(&update.gamma);
            if let (Some(stats), Some((theta, ratios))) = (sstats.as_mut(), update.sstats) {
                for (term, ratio) in ratios {
                    for topic in 0..k {
                        stats[[topic, term]] += theta[topic] * ratio;
                    }
                }
            }
        }

        let sstats = sstats.map(|stats| stats * exp_elog_beta);
        (gamma, sstats)
    }
}

impl TopicInference for VariationalLda {
    fn fit(&self, dtm: &DocumentTermMatrix) -> Result<FittedTopics> {
        let (n_docs, n_terms) = dtm.shape();
        if n_docs == 0 {
            return Err(TopicError::ModelFit("count matrix has no documents".into()));
        }
        if n_terms == 0 {
            return Err(TopicError::ModelFit("count matrix has no terms".into()));
        }

        let k = self.config.n_topics;
        let eta = self.config.eta();
        let init = Gamma::new(INIT_GAMMA_SHAPE, INIT_GAMMA_SCALE)
            .map_err(|e| TopicError::ModelFit(format!("gamma initializer: {e}")))?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.random_seed);

        let mut lambda = Array2::from_shape_simple_fn((k, n_terms), || init.sample(&mut rng));

        let batch_size = match self.config.learning_method {
            LearningMethod::Batch => n_docs,
            LearningMethod::Online => self.config.batch_size,
        };
        let mut batch_iter: u64 = 1;

        for pass in 0..self.config.max_iterations {
            let mut change = 0.0;

            for start in (0..n_docs).step_by(batch_size) {
                let end = (start + batch_size).min(n_docs);
                let exp_elog_beta = exp_dirichlet_expectation(&lambda);
                let gamma_init: Vec<Array1<f64>> = (start..end)
                    .map(|_| Array1::from_shape_simple_fn(k, || init.sample(&mut rng)))
                    .collect();

                let (_, sstats) =
                    self.e_step(&dtm.rows()[start..end], &exp_elog_beta, gamma_init, true);
                let Some(sstats) = sstats else {
                    return Err(TopicError::ModelFit("E-step produced no statistics".into()));
                };

                let updated = match self.config.learning_method {
                    LearningMethod::Batch => sstats + eta,
                    LearningMethod::Online => {
                        let rho = self.config.step_size(batch_iter);
                        let doc_ratio = n_docs as f64 / (end - start) as f64;
                        &lambda * (1.0 - rho) + (sstats * doc_ratio + eta) * rho
                    }
                };

                change = mean_abs_change(&lambda, &updated);
                lambda = updated;
                batch_iter += 1;
            }

            debug!(pass = pass + 1, mean_change = change, "LDA pass complete");
        }

        if lambda.iter().any(|v| !v.is_finite()) {
            return Err(TopicError::ModelFit(
                "inference diverged: topic-term weights are not finite".into(),
            ));
        }

        let training_distribution = self.infer(&lambda, dtm)?;

        Ok(FittedTopics {
            topic_term: lambda,
            training_distribution,
        })
    }

    fn infer(&self, topic_term: &Array2<f64>, dtm: &DocumentTermMatrix) -> Result<Array2<f64>> {
        let k = self.config.n_topics;
        if topic_term.nrows() != k || topic_term.ncols() != dtm.n_terms() {
            return Err(TopicError::ModelFit(format!(
                "dimension mismatch: weights are {}x{}, matrix has {} terms for {} topics",
                topic_term.nrows(),
                topic_term.ncols(),
                dtm.n_terms(),
                k
            )));
        }
        if dtm.n_documents() == 0 {
            return Ok(Array2::zeros((0, k)));
        }

        let exp_elog_beta = exp_dirichlet_expectation(topic_term);
        let gamma_init = vec![Array1::ones(k); dtm.n_documents()];
        let (mut gamma, _) = self.e_step(dtm.rows(), &exp_elog_beta, gamma_init, false);

        for mut row in gamma.rows_mut() {
            let total = row.sum();
            if total > 0.0 {
                row /= total;
            }
        }
        Ok(gamma)
    }
}

/// Iterate gamma for one document until it stops moving.
fn update_document(
    row: &[(usize, u32)],
    exp_elog_beta: &Array2<f64>,
    mut gamma: Array1<f64>,
    alpha: f64,
    max_iter: usize,
    tol: f64,
    with_sstats: bool,
) -> DocUpdate {
    if row.is_empty() {
        return DocUpdate {
            gamma,
            sstats: None,
        };
    }

    let ids: Vec<usize> = row.iter().map(|&(term, _)| term).collect();
    let counts: Array1<f64> = row.iter().map(|&(_, count)| count as f64).collect();
    let beta_d = exp_elog_beta.select(Axis(1), &ids);

    let mut exp_elog_theta = exp_dirichlet_expectation_1d(&gamma);
    let mut phi_norm = exp_elog_theta.dot(&beta_d) + f64::EPSILON;

    for _ in 0..max_iter {
        let last = gamma.clone();
        let ratio = &counts / &phi_norm;
        gamma = &exp_elog_theta * &beta_d.dot(&ratio) + alpha;
        exp_elog_theta = exp_dirichlet_expectation_1d(&gamma);
        phi_norm = exp_elog_theta.dot(&beta_d) + f64::EPSILON;

        if mean_abs_change_1d(&last, &gamma) < tol {
            break;
        }
    }

    let sstats = with_sstats.then(|| {
        let ratio = &counts / &phi_norm;
        let pairs = ids.iter().copied().zip(ratio.iter().copied()).collect();
        (exp_elog_theta, pairs)
    });

    DocUpdate { gamma, sstats }
}

/// exp(E[log X]) for X ~ Dirichlet(row), applied to every row.
pub fn exp_dirichlet_expectation(params: &Array2<f64>) -> Array2<f64> {
    let totals = params.sum_axis(Axis(1));
    let mut out = params.mapv(digamma);
    for (mut row, total) in out.rows_mut().into_iter().zip(totals.iter()) {
        let psi_total = digamma(*total);
        row.mapv_inplace(|v| (v - psi_total).exp());
    }
    out
}

/// exp(E[log X]) for X ~ Dirichlet(params).
pub fn exp_dirichlet_expectation_1d(params: &Array1<f64>) -> Array1<f64> {
    let psi_total = digamma(params.sum());
    params.mapv(|v| (digamma(v) - psi_total).exp())
}

fn mean_abs_change(a: &Array2<f64>, b: &Array2<f64>) -> f64 {
    (a - b).mapv(f64::abs).mean().unwrap_or(0.0)
}

fn mean_abs_change_1d(a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    (a - b).mapv(f64::abs).mean().unwrap_or(0.0)
}
