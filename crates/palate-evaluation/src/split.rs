use rand::seq::index;
use rand::Rng;

/// One train/test partition of item indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train_size: usize,
    /// Indices in draw order.
    pub train: Vec<usize>,
    /// The remaining indices, ascending.
    pub test: Vec<usize>,
}

impl Split {
    /// Draw `train_size` of `item_count` indices without replacement.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R, item_count: usize, train_size: usize) -> Self {
        let train = index::sample(rng, item_count, train_size).into_vec();
        let mut in_train = vec![false; item_count];
        for &i in &train {
            in_train[i] = true;
        }
        let test = (0..item_count).filter(|&i| !in_train[i]).collect();
        Self {
            train_size,
            train,
            test,
        }
    }
}

/// Every split for every train size, drawn in `train_sizes` order then trial
/// order, so one seed fixes the whole plan.
pub fn plan<R: Rng + ?Sized>(
    rng: &mut R,
    item_count: usize,
    train_sizes: &[usize],
    trials: usize,
) -> Vec<Split> {
    train_sizes
        .iter()
        .flat_map(|&k| std::iter::repeat(k).take(trials))
        .map(|k| Split::draw(rng, item_count, k))
        .collect()
}
