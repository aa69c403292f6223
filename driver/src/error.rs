use error_stack::Report;
use kernel::KernelError;

/// Lifts an adapter's native error into a [`KernelError`] report.
pub trait ConvertError: 'static + Sized {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T: 'static> ConvertError for Result<T, dotenvy::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| Report::new(error).change_context(KernelError::Internal))
    }
}

impl<T: 'static> ConvertError for Result<T, serde_json::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| Report::new(error).change_context(KernelError::Internal))
    }
}

impl<T: 'static> ConvertError for Result<T, reqwest::Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = if error.is_timeout() {
                KernelError::Timeout
            } else {
                KernelError::External
            };
            Report::new(error).change_context(context)
        })
    }
}
