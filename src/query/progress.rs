use crate::GoResult;

/// Receives progress updates of long running queries
///
/// `update` is called with the percentage of processed items, at most
/// 100 times per query. Returning an error aborts the query and the error
/// is handed back to the caller of the query unchanged.
///
/// Closures `FnMut(u8) -> GoResult<()>` implement `Progress`.
///
/// # Examples
///
/// ```
/// use goterm::{GoError, Progress};
///
/// let mut calls = Vec::new();
/// let mut progress = |percent: u8| -> Result<(), GoError> {
///     calls.push(percent);
///     if percent > 50 {
///         return Err(GoError::Aborted("enough".to_string()));
///     }
///     Ok(())
/// };
/// assert!(progress.update(10).is_ok());
/// assert!(progress.update(60).is_err());
/// ```
pub trait Progress {
    /// Reports that `percent` percent of the items are processed
    ///
    /// # Errors
    ///
    /// Any error aborts the running query
    fn update(&mut self, percent: u8) -> GoResult<()>;
}

impl<F> Progress for F
where
    F: FnMut(u8) -> GoResult<()>,
{
    fn update(&mut self, percent: u8) -> GoResult<()> {
        self(percent)
    }
}

/// A [`Progress`] that ignores all updates
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn update(&mut self, _percent: u8) -> GoResult<()> {
        Ok(())
    }
}

/// Forwards every `step`th item of a query to a [`Progress`]
pub(crate) struct Ticker<'p, P: Progress + ?Sized> {
    progress: &'p mut P,
    step: usize,
    count: usize,
    percent: u8,
}

impl<'p, P: Progress + ?Sized> Ticker<'p, P> {
    const MAX_UPDATES: u8 = 100;

    pub fn new(progress: &'p mut P, total: usize) -> Self {
        Self {
            progress,
            step: (total / usize::from(Self::MAX_UPDATES)).max(1),
            count: 0,
            percent: 0,
        }
    }

    /// Registers one item, before it is processed
    pub fn tick(&mut self) -> GoResult<()> {
        let report = self.count % self.step == 0 && self.percent < Self::MAX_UPDATES;
        self.count += 1;
        if report {
            self.progress.update(self.percent)?;
            self.percent += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::GoError;

    fn updates(total: usize) -> Vec<u8> {
        let mut seen = Vec::new();
        let mut progress = |percent: u8| -> GoResult<()> {
            seen.push(percent);
            Ok(())
        };
        let mut ticker = Ticker::new(&mut progress, total);
        for _ in 0..total {
            ticker.tick().unwrap();
        }
        seen
    }

    #[test]
    fn small_queries_update_every_item() {
        assert_eq!(updates(3), vec![0, 1, 2]);
        assert!(updates(0).is_empty());
    }

    #[test]
    fn at_most_100_updates() {
        for total in [99, 100, 101, 199, 250, 10_000] {
            let seen = updates(total);
            assert!(seen.len() <= 100, "{total}: {}", seen.len());
            assert_eq!(seen.first(), Some(&0));
            assert!(seen.windows(2).all(|w| w[0] < w[1]));
        }
        assert_eq!(updates(10_000).len(), 100);
    }

    #[test]
    fn error_aborts() {
        let mut progress = |percent: u8| -> GoResult<()> {
            if percent == 2 {
                Err(GoError::Aborted("stop".to_string()))
            } else {
                Ok(())
            }
        };
        let mut ticker = Ticker::new(&mut progress, 10);
        assert!(ticker.tick().is_ok());
        assert!(ticker.tick().is_ok());
        assert_eq!(ticker.tick(), Err(GoError::Aborted("stop".to_string())));
    }

    #[test]
    fn no_progress() {
        let mut progress = NoProgress;
        let mut ticker = Ticker::new(&mut progress, 5);
        for _ in 0..5 {
            assert!(ticker.tick().is_ok());
        }
    }
}
