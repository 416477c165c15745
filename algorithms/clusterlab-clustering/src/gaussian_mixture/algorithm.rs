use crate::gaussian_mixture::errors::{GmmError, Result};
use crate::gaussian_mixture::hyperparams::{
    GmmCovarType, GmmInitMethod, GmmParams, GmmValidParams,
};
use crate::k_means::{KMeans, KMeansError};
use clusterlab::{
    traits::{Fit, Predict},
    DatasetBase, Float, ParamGuard,
};
use linfa_linalg::{
    cholesky::Cholesky,
    triangular::{SolveTriangular, UPLO},
};
use ndarray::{s, Array, Array1, Array2, Array3, ArrayBase, ArrayView2, Axis, Data, Ix2, Ix3, Zip};
use ndarray_rand::rand::{Rng, SeedableRng};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand_xoshiro::Xoshiro256Plus;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
/// Gaussian Mixture Model (GMM) aims at clustering a dataset by finding normally
/// distributed sub datasets (hence the Gaussian Mixture name) .
///
/// GMM assumes all the data points are generated from a mixture of a number K
/// of Gaussian distributions with certain parameters.
/// Expectation-maximization (EM) algorithm is used to fit the GMM to the dataset
/// by parameterizing the weight, mean, and covariance of each cluster distribution.
///
/// ## The algorithm
///
/// The general idea is to maximize the likelihood (equivalently the log likelihood)
/// that is maximising the probability that the dataset is drawn from our mixture of normal distributions.
///
/// After an initialization step which can be either from random distribution or from the result
/// of the [KMeans](crate::KMeans) algorithm (which is the default value of the `init_method` parameter).
/// The core EM iterative algorithm for Gaussian Mixture is a fixed-point two-step algorithm:
///
/// 1. Expectation step: compute the expectation of the likelihood of the current gaussian mixture model wrt the dataset.
/// 2. Maximization step: update the gaussian parameters (weigths, means and covariances) to maximize the likelihood.
///
/// We stop iterating when there is no significant gaussian parameters change (controlled by the `tolerance` parameter) or
/// if we reach a max number of iterations (controlled by `max_n_iterations` parameter), in which case a warning is
/// logged. As the initialization of the algorithm is subject to randomness, several initializations are performed
/// (controlled by the `n_runs` parameter).
///
/// ## Tutorial
///
/// ```rust
/// use clusterlab::DatasetBase;
/// use clusterlab::traits::{Fit, Predict};
/// use clusterlab_clustering::GaussianMixtureModel;
/// use clusterlab_datasets::generate;
/// use ndarray::{array, Axis};
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// let mut rng = Xoshiro256Plus::seed_from_u64(42);
/// let expected_centroids = array![[0., 1.], [-10., 20.], [-1., 10.]];
/// let (records, _) = generate::make_blobs(300, &expected_centroids, &[1., 1., 1.], &mut rng).unwrap();
/// let dataset = DatasetBase::from(records);
///
/// let gmm = GaussianMixtureModel::params(3)
///     .n_runs(3)
///     .tolerance(1e-4)
///     .fit(&dataset)
///     .expect("GMM fitting");
///
/// // Predict returns the **index** of the most likely component
/// let component = gmm.predict(&array![[-9., 20.5]])[0];
/// let mean = gmm.means().index_axis(Axis(0), component);
/// assert!((mean[0] + 10.).abs() < 1. && (mean[1] - 20.).abs() < 1.);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianMixtureModel<F: Float> {
    covar_type: GmmCovarType,
    weights: Array1<F>,
    means: Array2<F>,
    covariances: Array3<F>,
    precisions: Array3<F>,
    precisions_chol: Array3<F>,
    labels: Array1<usize>,
    lower_bound: F,
    n_iter: u64,
    converged: bool,
}

impl<F: Float> GaussianMixtureModel<F> {
    fn new<D: Data<Elem = F>, R: Rng + SeedableRng + Clone, T>(
        hyperparameters: &GmmValidParams<F, R>,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, T>,
        rng: &mut R,
    ) -> Result<GaussianMixtureModel<F>> {
        let observations = dataset.records().view();
        let n_samples = observations.nrows();

        // We initialize responsabilities (n_samples, n_clusters) of each clusters
        // that is, given a sample, the probabilities of a cluster being the source.
        // Responsabilities can be initialized either from a KMeans result or randomly.
        let resp = match hyperparameters.init_method() {
            GmmInitMethod::KMeans => {
                let model = KMeans::params_with_rng(
                    hyperparameters.n_clusters(),
                    R::seed_from_u64(rng.gen()),
                )
                .check()
                .map_err(KMeansError::from)?
                .fit(dataset)?;
                let mut resp = Array::<F, Ix2>::zeros((n_samples, hyperparameters.n_clusters()));
                for (k, idx) in model.predict(dataset.records()).iter().enumerate() {
                    resp[[k, *idx]] = F::one();
                }
                resp
            }
            GmmInitMethod::Random => {
                let mut resp = Array2::<f64>::random_using(
                    (n_samples, hyperparameters.n_clusters()),
                    Uniform::new(0., 1.),
                    rng,
                );
                let totals = &resp.sum_axis(Axis(1)).insert_axis(Axis(0));
                resp = (resp.reversed_axes() / totals).reversed_axes();
                resp.mapv(|v| F::cast(v))
            }
        };

        // We compute an initial GMM model from dataset and initial responsabilities wrt
        // to covariance specification.
        let (mut weights, means, covariances) = Self::estimate_gaussian_parameters(
            &observations,
            &resp,
            hyperparameters.covariance_type(),
            hyperparameters.reg_covariance(),
        );
        weights /= F::cast(n_samples);

        // GmmCovarType = full
        let precisions_chol = Self::compute_precisions_cholesky_full(&covariances)?;
        let precisions = Self::compute_precisions_full(&precisions_chol);

        Ok(GaussianMixtureModel {
            covar_type: *hyperparameters.covariance_type(),
            weights,
            means,
            covariances,
            precisions,
            precisions_chol,
            labels: Array1::zeros(0),
            lower_bound: F::neg_infinity(),
            n_iter: 0,
            converged: false,
        })
    }
}

impl<F: Float> GaussianMixtureModel<F> {
    pub fn params(n_clusters: usize) -> GmmParams<F, Xoshiro256Plus> {
        GmmParams::new(n_clusters)
    }

    pub fn params_with_rng<R: Rng + Clone>(n_clusters: usize, rng: R) -> GmmParams<F, R> {
        GmmParams::new_with_rng(n_clusters, rng)
    }

    pub fn weights(&self) -> &Array1<F> {
        &self.weights
    }

    pub fn means(&self) -> &Array2<F> {
        &self.means
    }

    pub fn covariances(&self) -> &Array3<F> {
        &self.covariances
    }

    pub fn precisions(&self) -> &Array3<F> {
        &self.precisions
    }

    pub fn centroids(&self) -> &Array2<F> {
        self.means()
    }

    /// Most likely component of every training sample, as given by a final expectation step
    pub fn labels(&self) -> &Array1<usize> {
        &self.labels
    }

    /// Mean log-likelihood of the training samples under the best run
    pub fn lower_bound(&self) -> F {
        self.lower_bound
    }

    /// EM iterations of the best run
    pub fn n_iter(&self) -> u64 {
        self.n_iter
    }

    /// Whether the best run stopped because the lower bound settled
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Probability of every component for every sample, each row sums to one
    pub fn predict_probabilities<D: Data<Elem = F>>(
        &self,
        observations: &ArrayBase<D, Ix2>,
    ) -> Array2<F> {
        let (_, log_resp) = self.estimate_log_prob_resp(observations);
        log_resp.mapv(|v| v.exp())
    }

    fn estimate_gaussian_parameters<D: Data<Elem = F>>(
        observations: &ArrayBase<D, Ix2>,
        resp: &Array2<F>,
        _covar_type: &GmmCovarType,
        reg_covar: F,
    ) -> (Array1<F>, Array2<F>, Array3<F>) {
        // an emptied component keeps a tiny mass instead of dividing by zero
        let nk = resp.sum_axis(Axis(0)) + F::cast(10.) * F::epsilon();

        let nk2 = nk.to_owned().insert_axis(Axis(1));
        let means = resp.t().dot(observations) / nk2;
        // GmmCovarType = Full
        let covariances =
            Self::estimate_gaussian_covariances_full(observations, resp, &nk, &means, reg_covar);
        (nk, means, covariances)
    }

    fn estimate_gaussian_covariances_full<D: Data<Elem = F>>(
        observations: &ArrayBase<D, Ix2>,
        resp: &Array2<F>,
        nk: &Array1<F>,
        means: &Array2<F>,
        reg_covar: F,
    ) -> Array3<F> {
        let n_clusters = means.nrows();
        let n_features = means.ncols();
        let mut covariances = Array::zeros((n_clusters, n_features, n_features));
        for k in 0..n_clusters {
            let diff = observations - &means.row(k);
            let m = &diff.t() * &resp.index_axis(Axis(1), k);
            let mut cov_k = m.dot(&diff) / nk[k];
            cov_k.diag_mut().mapv_inplace(|x| x + reg_covar);
            covariances.slice_mut(s![k, .., ..]).assign(&cov_k);
        }
        covariances
    }

    fn compute_precisions_cholesky_full<D: Data<Elem = F>>(
        covariances: &ArrayBase<D, Ix3>,
    ) -> Result<Array3<F>> {
        let eye: Array2<F> = Array::eye(covariances.shape()[1]);
        let mut precisions_chol = Array::zeros(covariances.raw_dim());
        for (k, covariance) in covariances.outer_iter().enumerate() {
            let decomp = covariance.cholesky()?;
            let sol = decomp.solve_triangular(&eye, UPLO::Lower)?;
            precisions_chol.slice_mut(s![k, .., ..]).assign(&sol.t());
        }
        Ok(precisions_chol)
    }

    fn compute_precisions_full<D: Data<Elem = F>>(
        precisions_chol: &ArrayBase<D, Ix3>,
    ) -> Array3<F> {
        let mut precisions = Array3::zeros(precisions_chol.dim());
        for (k, prec_chol) in precisions_chol.outer_iter().enumerate() {
            precisions
                .slice_mut(s![k, .., ..])
                .assign(&prec_chol.dot(&prec_chol.t()));
        }
        precisions
    }

    // Refresh precisions value only at the end of the fitting procedure
    fn refresh_precisions_full(&mut self) {
        self.precisions = Self::compute_precisions_full(&self.precisions_chol);
    }

    fn e_step(&self, observations: &ArrayView2<F>) -> (F, Array2<F>) {
        let (log_prob_norm, log_resp) = self.estimate_log_prob_resp(observations);
        let log_mean = log_prob_norm.sum() / F::cast(log_prob_norm.len());
        (log_mean, log_resp)
    }

    fn m_step(
        &mut self,
        reg_covar: F,
        observations: &ArrayView2<F>,
        log_resp: &Array2<F>,
    ) -> Result<()> {
        let n_samples = observations.nrows();
        let (weights, means, covariances) = Self::estimate_gaussian_parameters(
            observations,
            &log_resp.mapv(|x| x.exp()),
            &self.covar_type,
            reg_covar,
        );
        self.means = means;
        self.weights = weights / F::cast(n_samples);
        // GmmCovarType = Full()
        self.precisions_chol = Self::compute_precisions_cholesky_full(&covariances)?;
        self.covariances = covariances;
        Ok(())
    }

    // Estimate log probabilities (log P(X)) and responsibilities for each sample.
    // Compute weighted log probabilities per component (log P(X)) and responsibilities
    // for each sample in X with respect to the current state of the model.
    fn estimate_log_prob_resp<D: Data<Elem = F>>(
        &self,
        observations: &ArrayBase<D, Ix2>,
    ) -> (Array1<F>, Array2<F>) {
        let weighted_log_prob = self.estimate_weighted_log_prob(observations);
        let log_prob_norm = weighted_log_prob.map_axis(Axis(1), |row| {
            let max = row.fold(F::neg_infinity(), |m, &x| m.max(x));
            if max.is_finite() {
                max + row.mapv(|x| (x - max).exp()).sum().ln()
            } else {
                max
            }
        });
        let log_resp = weighted_log_prob - log_prob_norm.to_owned().insert_axis(Axis(1));
        (log_prob_norm, log_resp)
    }

    // Estimate weighted log probabilities for each samples wrt to the model
    fn estimate_weighted_log_prob<D: Data<Elem = F>>(
        &self,
        observations: &ArrayBase<D, Ix2>,
    ) -> Array2<F> {
        self.estimate_log_gaussian_prob(observations) + self.estimate_log_weights()
    }

    // Compute the log likelihood in case of the gaussian probabilities
    // log(P(X|Mean, Precision)) = -0.5*(d*ln(2*PI)-ln(det(Precision))-(X-Mean)^t.Precision.(X-Mean)
    fn estimate_log_gaussian_prob<D: Data<Elem = F>>(
        &self,
        observations: &ArrayBase<D, Ix2>,
    ) -> Array2<F> {
        let n_samples = observations.nrows();
        let n_features = observations.ncols();
        let means = self.means();
        let n_clusters = means.nrows();
        // GmmCovarType = full
        // det(precision_chol) is half of det(precision)
        let log_det = Self::compute_log_det_cholesky_full(&self.precisions_chol);
        let mut log_prob: Array2<F> = Array::zeros((n_samples, n_clusters));
        Zip::indexed(means.rows())
            .and(self.precisions_chol.outer_iter())
            .for_each(|k, mu, prec_chol| {
                let diff = (observations - &mu).dot(&prec_chol);
                log_prob
                    .slice_mut(s![.., k])
                    .assign(&diff.mapv(|v| v * v).sum_axis(Axis(1)))
            });
        log_prob.mapv(|v| {
            F::cast(-0.5) * (v + F::cast(n_features as f64 * f64::ln(2. * std::f64::consts::PI)))
        }) + log_det
    }

    fn compute_log_det_cholesky_full<D: Data<Elem = F>>(
        matrix_chol: &ArrayBase<D, Ix3>,
    ) -> Array1<F> {
        matrix_chol
            .outer_iter()
            .map(|chol| chol.diag().mapv(|x| x.ln()).sum())
            .collect()
    }

    fn estimate_log_weights(&self) -> Array1<F> {
        self.weights().mapv(|x| x.ln())
    }

    fn assign<D: Data<Elem = F>>(&self, observations: &ArrayBase<D, Ix2>) -> Array1<usize> {
        self.estimate_weighted_log_prob(observations)
            .map_axis(Axis(1), |row| {
                row.iter()
                    .enumerate()
                    .fold((0, F::neg_infinity()), |best, (k, &v)| {
                        if v > best.1 {
                            (k, v)
                        } else {
                            best
                        }
                    })
                    .0
            })
    }
}

impl<F: Float, R: Rng + SeedableRng + Clone, D: Data<Elem = F>, T>
    Fit<ArrayBase<D, Ix2>, T, GmmError> for GmmValidParams<F, R>
{
    type Object = GaussianMixtureModel<F>;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, T>) -> Result<Self::Object> {
        let observations = dataset.records().view();
        let n_samples = observations.nrows();
        if n_samples < self.n_clusters() {
            return Err(GmmError::NotEnoughSamples {
                n_samples,
                n_clusters: self.n_clusters(),
            });
        }

        let mut rng = self.rng();
        let mut best: Option<GaussianMixtureModel<F>> = None;

        for _ in 0..self.n_runs() {
            let mut gmm = GaussianMixtureModel::<F>::new(self, dataset, &mut rng)?;
            let mut lower_bound = F::neg_infinity();

            for n_iter in 1..=self.max_n_iterations() {
                let prev_lower_bound = lower_bound;
                let (log_prob_norm, log_resp) = gmm.e_step(&observations);
                gmm.m_step(self.reg_covariance(), &observations, &log_resp)?;
                lower_bound = log_prob_norm;
                gmm.n_iter = n_iter;
                let change = lower_bound - prev_lower_bound;
                if change.abs() < self.tolerance() {
                    gmm.converged = true;
                    break;
                }
            }
            gmm.lower_bound = lower_bound;

            let improves = match &best {
                Some(b) => lower_bound > b.lower_bound,
                None => lower_bound > F::neg_infinity(),
            };
            if improves {
                best = Some(gmm);
            }
        }

        let mut gmm = best.ok_or_else(|| {
            GmmError::LowerBoundError("No lower bound improvement (-inf)".to_string())
        })?;
        if !gmm.converged {
            log::warn!(
                "Best of {} EM runs did not converge. Try different init parameters, \
                 or increase max_n_iterations, tolerance or check for degenerate data.",
                self.n_runs()
            );
        }
        gmm.refresh_precisions_full();
        // final e-step so that the fitted labels agree with `predict`
        gmm.labels = gmm.assign(&observations);
        log::debug!(
            "GMM fitted {} components in {} iterations, lower bound {}",
            self.n_clusters(),
            gmm.n_iter,
            gmm.lower_bound
        );
        Ok(gmm)
    }
}

impl<F: Float, D: Data<Elem = F>> Predict<&ArrayBase<D, Ix2>, Array1<usize>>
    for GaussianMixtureModel<F>
{
    fn predict(&self, observations: &ArrayBase<D, Ix2>) -> Array1<usize> {
        self.assign(observations)
    }
}

impl<F: Float, D: Data<Elem = F>, T>
    Predict<DatasetBase<ArrayBase<D, Ix2>, T>, DatasetBase<ArrayBase<D, Ix2>, Array1<usize>>>
    for GaussianMixtureModel<F>
{
    fn predict(
        &self,
        dataset: DatasetBase<ArrayBase<D, Ix2>, T>,
    ) -> DatasetBase<ArrayBase<D, Ix2>, Array1<usize>> {
        let labels = self.assign(dataset.records());
        dataset.with_targets(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{abs_diff_eq, assert_abs_diff_eq};
    use clusterlab::metrics::adjusted_rand_index;
    use clusterlab_datasets::generate;
    use linfa_linalg::LinalgError;
    use ndarray::{array, concatenate, ArrayView1, ArrayView2};
    use ndarray_rand::rand_distr::{Distribution, StandardNormal};

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<GaussianMixtureModel<f64>>();
        has_autotraits::<GmmParams<f64, Xoshiro256Plus>>();
        has_autotraits::<GmmError>();
    }

    pub struct MultivariateNormal {
        pub mean: Array1<f64>,
        /// Lower triangular matrix (Cholesky decomposition of the coviariance matrix)
        lower: Array2<f64>,
    }
    impl MultivariateNormal {
        pub fn new(mean: &ArrayView1<f64>, covariance: &ArrayView2<f64>) -> Self {
            MultivariateNormal {
                mean: mean.to_owned(),
                lower: covariance.cholesky().unwrap(),
            }
        }
    }
    impl Distribution<Array1<f64>> for MultivariateNormal {
        fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Array1<f64> {
            // standard normal distribution
            let res = Array1::random_using(self.mean.shape()[0], StandardNormal, rng);
            // use Cholesky decomposition to obtain a sample of our general multivariate normal
            self.mean.clone() + self.lower.view().dot(&res)
        }
    }

    #[test]
    fn test_gmm_fit() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let weights = array![0.5, 0.5];
        let means = array![[0., 0.], [5., 5.]];
        let covars = array![[[1., 0.8], [0.8, 1.]], [[1.0, -0.6], [-0.6, 1.0]]];
        let mvn1 = MultivariateNormal::new(&means.slice(s![0, ..]), &covars.slice(s![0, .., ..]));
        let mvn2 = MultivariateNormal::new(&means.slice(s![1, ..]), &covars.slice(s![1, .., ..]));

        let n = 500;
        let mut observations = Array2::zeros((2 * n, means.ncols()));
        for (i, mut row) in observations.rows_mut().into_iter().enumerate() {
            let sample = if i < n {
                mvn1.sample(&mut rng)
            } else {
                mvn2.sample(&mut rng)
            };
            row.assign(&sample);
        }
        let dataset = DatasetBase::from(observations);
        let gmm = GaussianMixtureModel::params(2)
            .with_rng(rng)
            .fit(&dataset)
            .expect("GMM fitting");

        // check weights
        let w = gmm.weights();
        assert_abs_diff_eq!(w, &weights, epsilon = 1e-1);
        assert_abs_diff_eq!(w.sum(), 1., epsilon = 1e-12);
        // check means (since kmeans centroids are ordered randomly, we try matching both orderings)
        let m = gmm.means();
        assert!(
            abs_diff_eq!(means, m.to_owned(), epsilon = 1e-1)
                || abs_diff_eq!(means, m.slice(s![..;-1, ..]).to_owned(), epsilon = 1e-1)
        );
        // check covariances
        let c = gmm.covariances();
        assert!(
            abs_diff_eq!(covars, c.to_owned(), epsilon = 1e-1)
                || abs_diff_eq!(covars, c.slice(s![..;-1, .., ..]).to_owned(), epsilon = 1e-1)
        );
        assert!(gmm.converged());
        assert_eq!(gmm.labels(), &gmm.predict(dataset.records()));
    }

    fn function_test_1d(x: &Array2<f64>) -> Array2<f64> {
        let mut y = Array2::zeros(x.dim());
        Zip::from(&mut y).and(x).for_each(|yi, &xi| {
            if xi < 0.4 {
                *yi = xi * xi;
            } else if (0.4..0.8).contains(&xi) {
                *yi = 3. * xi + 1.;
            } else {
                *yi = f64::sin(10. * xi);
            }
        });
        y
    }

    #[test]
    fn test_zeroed_reg_covar_const_failure() {
        // repeat values such that covariance is zero
        let xt = Array2::ones((50, 1));
        let data = concatenate(Axis(1), &[xt.view(), xt.view()]).unwrap();
        let dataset = DatasetBase::from(data);

        // Test that cholesky decomposition fails when reg_covariance is zero
        let gmm = GaussianMixtureModel::params(1)
            .reg_covariance(0.)
            .fit(&dataset);
        assert!(matches!(
            gmm,
            Err(GmmError::LinalgError(LinalgError::NotPositiveDefinite))
        ));

        // Test it passes when default value is used
        assert!(GaussianMixtureModel::params(1).fit(&dataset).is_ok());
    }

    #[test]
    fn test_random_init() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let xt = Array2::random_using((50, 1), Uniform::new(0., 1.), &mut rng);
        let yt = function_test_1d(&xt);
        let data = concatenate(Axis(1), &[xt.view(), yt.view()]).unwrap();
        let dataset = DatasetBase::from(data);

        let gmm = GaussianMixtureModel::params(3)
            .init_method(GmmInitMethod::Random)
            .n_runs(3)
            .with_rng(rng)
            .fit(&dataset)
            .unwrap();
        assert_abs_diff_eq!(gmm.weights().sum(), 1., epsilon = 1e-12);
        let proba = gmm.predict_probabilities(dataset.records());
        for row in proba.rows() {
            assert_abs_diff_eq!(row.sum(), 1., epsilon = 1e-9);
        }
    }

    #[test]
    fn test_centroids_prediction() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let expected_centroids = array![[0., 1.], [-10., 20.], [-1., 10.]];
        let (records, truth) =
            generate::make_blobs(600, &expected_centroids, &[1., 1., 1.], &mut rng).unwrap();
        let blobs = DatasetBase::from(records);

        let n_clusters = expected_centroids.len_of(Axis(0));
        let gmm = GaussianMixtureModel::params(n_clusters)
            .with_rng(rng)
            .fit(&blobs)
            .expect("GMM fitting");

        let gmm_centroids = gmm.centroids();
        let memberships = gmm.predict(&expected_centroids);

        // check that centroids used to generate test dataset belongs to the right predicted cluster
        for (i, expected_c) in expected_centroids.outer_iter().enumerate() {
            let closest_c = gmm_centroids.index_axis(Axis(0), memberships[i]);
            Zip::from(&closest_c)
                .and(&expected_c)
                .for_each(|a, b| assert_abs_diff_eq!(a, b, epsilon = 1.))
        }
        let labels = gmm.labels().as_slice().unwrap();
        let ari = adjusted_rand_index(truth.as_slice().unwrap(), labels).unwrap();
        assert_abs_diff_eq!(ari, 1., epsilon = 1e-12);
    }

    #[test]
    fn test_not_enough_samples() {
        let res = GaussianMixtureModel::params(3).fit(&DatasetBase::from(array![[0.], [1.]]));
        assert!(matches!(
            res,
            Err(GmmError::NotEnoughSamples {
                n_samples: 2,
                n_clusters: 3
            })
        ));
    }
}
