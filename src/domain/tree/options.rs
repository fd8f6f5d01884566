/// Tuning knobs for [`TreeBuilder`](super::builder::TreeBuilder).
///
/// None of these change the resulting root, only how the work is scheduled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    /// Reduce wide levels on the rayon pool.
    pub parallel: bool,
    /// Minimum number of pairs in a level before it goes to the pool.
    pub parallel_threshold: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 1024,
        }
    }
}

impl BuildOptions {
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub(crate) fn use_pool(&self, pairs: usize) -> bool {
        self.parallel && pairs >= self.parallel_threshold
    }
}
