/// Periodic training diagnostics handed to the progress observer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrainingProgress {
    /// 1-based iteration index.
    pub iteration: usize,
    /// Regularized loss over the centered training set.
    pub loss: f64,
    /// RMSE of the clamped predictions over the raw training set.
    pub rmse: f64,
}
