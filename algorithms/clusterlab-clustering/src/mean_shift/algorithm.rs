use crate::distance::{Distance, L2Dist};
use crate::mean_shift::{MeanShiftError, MeanShiftParams, MeanShiftValidParams};
use crate::neighbors::build_index;
use clusterlab::traits::{Fit, Predict};
use clusterlab::{DatasetBase, Float};
use clusterlab_nn::{CommonNearestNeighbour, NearestNeighbourIndex};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Axis, Data, Ix2};
use noisy_float::{checkers::NumChecker, NoisyFloat};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// Mean shift finds the modes of the density of the samples by hill climbing from a set of
/// seeds. Each seed repeatedly moves to the mean of the samples within `bandwidth` of it (a flat
/// kernel) until it stops moving. The converged seeds, deduplicated, are the cluster centres
/// and every sample belongs to its nearest centre.
///
/// Unlike K-means the number of clusters is not a parameter, it follows from the bandwidth,
/// which can be estimated from the data with
/// [`estimate_bandwidth`](crate::neighbors::estimate_bandwidth).
///
/// Seeding from every sample costs one hill climb per sample. With `bin_seeding` the samples
/// are first binned on a grid of cell size `bandwidth` and only the populated cells are used as
/// seeds.
///
/// ## Tutorial
///
/// ```
/// use clusterlab::DatasetBase;
/// use clusterlab::traits::Fit;
/// use clusterlab_clustering::MeanShift;
/// use ndarray::array;
///
/// let records = array![[1., 1.], [2., 1.], [1., 0.], [4., 7.], [3., 5.], [3., 6.]];
/// let model = MeanShift::params(2.)
///     .fit(&DatasetBase::from(records))
///     .unwrap();
///
/// assert_eq!(model.cluster_centers().nrows(), 2);
/// assert_eq!(model.labels()[0], model.labels()[1]);
/// assert_ne!(model.labels()[0], model.labels()[3]);
/// ```
pub struct MeanShift<F> {
    cluster_centers: Array2<F>,
    labels: Array1<Option<usize>>,
    bandwidth: F,
    cluster_all: bool,
    n_iter: usize,
}

impl<F: Float> MeanShift<F> {
    /// Configures mean shift with the radius of its flat kernel
    pub fn params(bandwidth: F) -> MeanShiftParams<F> {
        MeanShiftParams::new(bandwidth)
    }

    /// Cluster centres sorted by decreasing number of samples within bandwidth
    pub fn cluster_centers(&self) -> &Array2<F> {
        &self.cluster_centers
    }

    /// Labels of the training samples
    pub fn labels(&self) -> &Array1<Option<usize>> {
        &self.labels
    }

    /// Largest number of iterations run by a seed
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    // Nearest centre, the first one on ties
    fn closest(&self, row: ArrayView1<F>) -> (usize, F) {
        let mut best = (0, F::infinity());
        for (i, center) in self.cluster_centers.rows().into_iter().enumerate() {
            let dist = L2Dist.distance(row, center);
            if dist < best.1 {
                best = (i, dist);
            }
        }
        best
    }

    fn assign(&self, observations: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array1<Option<usize>> {
        observations
            .rows()
            .into_iter()
            .map(|row| {
                let (closest, dist) = self.closest(row);
                if self.cluster_all || dist <= self.bandwidth {
                    Some(closest)
                } else {
                    None
                }
            })
            .collect()
    }
}

impl<F: Float> MeanShiftValidParams<F> {
    /// Seeds on the grid of cell size `bandwidth`, or every sample when binning does not reduce
    /// their number
    fn bin_seeds(&self, records: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array2<F> {
        let bandwidth = self.bandwidth();
        let mut bins: BTreeMap<Vec<i64>, usize> = BTreeMap::new();
        for row in records.rows() {
            let cell = row
                .iter()
                .map(|x| (*x / bandwidth).round().to_i64().unwrap_or(0))
                .collect();
            *bins.entry(cell).or_insert(0) += 1;
        }
        let seeds: Vec<_> = bins
            .into_iter()
            .filter(|(_, count)| *count >= self.min_bin_freq())
            .map(|(cell, _)| cell)
            .collect();
        if seeds.len() == records.nrows() {
            log::warn!(
                "Binning data failed with provided bin_size={}, using data points as seeds.",
                bandwidth
            );
            return records.to_owned();
        }

        let mut grid = Array2::zeros((seeds.len(), records.ncols()));
        for (mut row, cell) in grid.rows_mut().into_iter().zip(seeds) {
            for (x, c) in row.iter_mut().zip(cell) {
                *x = F::cast(c) * bandwidth;
            }
        }
        grid
    }

    /// Moves a seed to the mean of its neighbourhood until it settles
    ///
    /// Returns the final mean, the number of samples within bandwidth of it (zero when the seed
    /// has no neighbour) and the iterations run.
    fn climb(
        &self,
        nn: &dyn NearestNeighbourIndex<F>,
        seed: ArrayView1<F>,
        records: &ArrayBase<impl Data<Elem = F>, Ix2>,
    ) -> Result<(Array1<F>, usize, usize), MeanShiftError> {
        let stop_thresh = F::cast(1e-3) * self.bandwidth();
        let mut mean = seed.to_owned();
        let mut completed = 0;
        loop {
            let within: Vec<usize> = nn
                .within_range(mean.view(), self.bandwidth())?
                .into_iter()
                .map(|(_, i)| i)
                .collect();
            if within.is_empty() {
                return Ok((mean, 0, completed));
            }
            let old_mean = mean;
            mean = records
                .select(Axis(0), &within)
                .mean_axis(Axis(0))
                .unwrap_or_else(|| old_mean.clone());
            if L2Dist.distance(mean.view(), old_mean.view()) < stop_thresh
                || completed == self.max_n_iterations()
            {
                return Ok((mean, within.len(), completed));
            }
            completed += 1;
        }
    }
}

impl<F: Float, DA: Data<Elem = F>, T> Fit<ArrayBase<DA, Ix2>, T, MeanShiftError>
    for MeanShiftValidParams<F>
{
    type Object = MeanShift<F>;

    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<DA, Ix2>, T>,
    ) -> Result<MeanShift<F>, MeanShiftError> {
        let records = dataset.records();
        let seeds = if self.bin_seeding() {
            self.bin_seeds(records)
        } else {
            records.to_owned()
        };

        let nn = build_index(&CommonNearestNeighbour::KdTree, records, L2Dist);
        let mut n_iter = 0;
        let mut candidates: Vec<(Array1<F>, usize)> = Vec::new();
        for seed in seeds.rows() {
            let (center, intensity, iterations) = self.climb(&*nn, seed, records)?;
            n_iter = n_iter.max(iterations);
            if intensity > 0 && !candidates.iter().any(|(c, _)| c == &center) {
                candidates.push((center, intensity));
            }
        }
        if candidates.is_empty() {
            return Err(MeanShiftError::NoCenters(self.bandwidth().to_f64().unwrap_or(f64::NAN)));
        }

        // Most populated centres first, ties broken by the centre coordinates
        let key = |(c, n): &(Array1<F>, usize)| {
            (
                *n,
                c.iter()
                    .map(|x| NoisyFloat::<_, NumChecker>::new(*x))
                    .collect::<Vec<_>>(),
            )
        };
        candidates.sort_by(|a, b| key(b).cmp(&key(a)));

        let mut unique = vec![true; candidates.len()];
        for i in 0..candidates.len() {
            if !unique[i] {
                continue;
            }
            for j in (i + 1)..candidates.len() {
                if L2Dist.distance(candidates[i].0.view(), candidates[j].0.view())
                    <= self.bandwidth()
                {
                    unique[j] = false;
                }
            }
        }
        let centers: Vec<_> = candidates
            .into_iter()
            .zip(unique)
            .filter(|(_, keep)| *keep)
            .map(|((c, _), _)| c)
            .collect();
        let views: Vec<_> = centers.iter().map(|c| c.view()).collect();
        let cluster_centers =
            ndarray::stack(Axis(0), &views).map_err(clusterlab::error::Error::from)?;
        log::debug!("Mean shift found {} centres", cluster_centers.nrows());

        let mut model = MeanShift {
            cluster_centers,
            labels: Array1::from_elem(0, None),
            bandwidth: self.bandwidth(),
            cluster_all: self.cluster_all(),
            n_iter,
        };
        model.labels = model.assign(records);
        Ok(model)
    }
}

impl<F: Float, DA: Data<Elem = F>> Predict<&ArrayBase<DA, Ix2>, Array1<Option<usize>>>
    for MeanShift<F>
{
    /// Index of the nearest centre, `None` if it lies farther than the bandwidth and
    /// `cluster_all` is disabled
    fn predict(&self, observations: &ArrayBase<DA, Ix2>) -> Array1<Option<usize>> {
        self.assign(observations)
    }
}

impl<F: Float, DA: Data<Elem = F>, T>
    Predict<
        DatasetBase<ArrayBase<DA, Ix2>, T>,
        DatasetBase<ArrayBase<DA, Ix2>, Array1<Option<usize>>>,
    > for MeanShift<F>
{
    fn predict(
        &self,
        dataset: DatasetBase<ArrayBase<DA, Ix2>, T>,
    ) -> DatasetBase<ArrayBase<DA, Ix2>, Array1<Option<usize>>> {
        let labels = self.assign(dataset.records());
        dataset.with_targets(labels)
    }
}
