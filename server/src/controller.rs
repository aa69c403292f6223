use std::future::Future;

use kernel::KernelError;

use crate::error::ErrorStatus;

/// Turns a wire request into the input of an application service.
pub trait Intake<I>: 'static + Sync + Send {
    type To;
    fn emit(&self, input: I) -> Self::To;
}

/// Turns the output of an application service into a response.
pub trait Exhaust<O>: 'static + Sync + Send {
    type To;
    fn emit(&self, output: O) -> Self::To;
}

pub struct Controller<T, P> {
    transformer: T,
    presenter: P,
}

impl<T, P> Controller<T, P> {
    pub fn new(transformer: T, presenter: P) -> Self {
        Self {
            transformer,
            presenter,
        }
    }

    pub fn intake<I>(self, input: I) -> Transformed<P, T::To>
    where
        T: Intake<I>,
    {
        Transformed {
            input: self.transformer.emit(input),
            presenter: self.presenter,
        }
    }
}

impl<P> Controller<(), P> {
    /// For calls that take nothing beyond the caller.
    pub async fn bypass<F, Fut, O>(self, f: F) -> Result<P::To, ErrorStatus>
    where
        P: Exhaust<O>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = error_stack::Result<O, KernelError>>,
    {
        Ok(self.presenter.emit(f().await?))
    }
}

pub struct Transformed<P, D> {
    input: D,
    presenter: P,
}

impl<P, D> Transformed<P, D> {
    pub async fn handle<F, Fut, O>(self, f: F) -> Result<P::To, ErrorStatus>
    where
        P: Exhaust<O>,
        F: FnOnce(D) -> Fut,
        Fut: Future<Output = error_stack::Result<O, KernelError>>,
    {
        Ok(self.presenter.emit(f(self.input).await?))
    }
}

#[cfg(test)]
mod test {
    use error_stack::Report;
    use kernel::KernelError;

    use super::{Controller, Exhaust, Intake};

    struct Doubling;

    impl Intake<i32> for Doubling {
        type To = i64;
        fn emit(&self, input: i32) -> Self::To {
            i64::from(input) * 2
        }
    }

    struct Printing;

    impl Exhaust<i64> for Printing {
        type To = String;
        fn emit(&self, output: i64) -> Self::To {
            output.to_string()
        }
    }

    #[tokio::test]
    async fn input_flows_through_transformer_and_presenter() {
        let out = Controller::new(Doubling, Printing)
            .intake(21)
            .handle(|doubled| async move { Ok(doubled + 1) })
            .await
            .unwrap();
        assert_eq!(out, "43");
    }

    #[tokio::test]
    async fn service_errors_short_circuit() {
        let result = Controller::new(Doubling, Printing)
            .intake(1)
            .handle(|_| async { Err::<i64, _>(Report::new(KernelError::NotFound)) })
            .await;
        assert!(result.is_err());
    }
}
