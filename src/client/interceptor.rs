//! Request and response interceptors
//!
//! Interceptors run in registration order. A request interceptor may rewrite
//! the descriptor before dispatch; a response interceptor may rewrite a
//! successful response or react to a terminal failure. Any interceptor that
//! returns an error stops the rest of the chain.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info};
use serde_json::Value;

use super::request::{ApiResponse, RequestDescriptor};
use crate::error::{ApiError, Result};

/// Hook run before a logical call is dispatched
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    async fn on_request(&self, request: RequestDescriptor) -> Result<RequestDescriptor>;
}

/// Hook run after a call resolves
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    /// Called with every successful network response
    async fn on_response(
        &self,
        _request: &RequestDescriptor,
        response: ApiResponse<Value>,
    ) -> Result<ApiResponse<Value>> {
        Ok(response)
    }

    /// Called with the terminal error of a call before it reaches the caller.
    ///
    /// Returning `Ok` lets the original error propagate; returning `Err`
    /// replaces it.
    async fn on_error(&self, _request: &RequestDescriptor, _error: &ApiError) -> Result<()> {
        Ok(())
    }
}

/// Ordered interceptor lists
#[derive(Default, Clone)]
pub struct InterceptorChain {
    request: Vec<Arc<dyn RequestInterceptor>>,
    response: Vec<Arc<dyn ResponseInterceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_request(&mut self, interceptor: Arc<dyn RequestInterceptor>) {
        self.request.push(interceptor);
    }

    pub fn add_response(&mut self, interceptor: Arc<dyn ResponseInterceptor>) {
        self.response.push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.request.len() + self.response.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub async fn apply_request(&self, mut request: RequestDescriptor) -> Result<RequestDescriptor> {
        for interceptor in &self.request {
            request = interceptor.on_request(request).await?;
        }
        Ok(request)
    }

    pub async fn apply_response(
        &self,
        request: &RequestDescriptor,
        mut response: ApiResponse<Value>,
    ) -> Result<ApiResponse<Value>> {
        for interceptor in &self.response {
            response = interceptor.on_response(request, response).await?;
        }
        Ok(response)
    }

    /// Give every response interceptor a chance to react to `error`, then
    /// return the error the caller should see.
    pub async fn apply_error(&self, request: &RequestDescriptor, error: ApiError) -> crate::error::Error {
        for interceptor in &self.response {
            if let Err(replacement) = interceptor.on_error(request, &error).await {
                return replacement;
            }
        }
        error.into()
    }
}

/// Logs every request, response, and terminal failure
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingInterceptor;

#[async_trait]
impl RequestInterceptor for LoggingInterceptor {
    async fn on_request(&self, request: RequestDescriptor) -> Result<RequestDescriptor> {
        info!("[API] {} {}", request.method, request.path);
        Ok(request)
    }
}

#[async_trait]
impl ResponseInterceptor for LoggingInterceptor {
    async fn on_response(
        &self,
        request: &RequestDescriptor,
        response: ApiResponse<Value>,
    ) -> Result<ApiResponse<Value>> {
        debug!(
            "[API] Response received: {} {} (success={})",
            request.method, request.path, response.success
        );
        Ok(response)
    }

    async fn on_error(&self, request: &RequestDescriptor, err: &ApiError) -> Result<()> {
        error!("[API] {} {} failed: {}", request.method, request.path, err);
        Ok(())
    }
}

/// Handler invoked when the API rejects the session
pub type UnauthorizedHandler = Arc<dyn Fn(&ApiError) + Send + Sync>;

/// Calls a handler on any 401 response, e.g. to send the user back to login.
///
/// The error still propagates to the caller afterwards.
#[derive(Clone)]
pub struct UnauthorizedInterceptor {
    handler: UnauthorizedHandler,
}

impl UnauthorizedInterceptor {
    pub fn new(handler: impl Fn(&ApiError) + Send + Sync + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

#[async_trait]
impl ResponseInterceptor for UnauthorizedInterceptor {
    async fn on_error(&self, _request: &RequestDescriptor, err: &ApiError) -> Result<()> {
        if err.status() == Some(401) {
            (self.handler)(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Appends its name to a shared log and tags the request with it
    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl RequestInterceptor for Recorder {
        async fn on_request(&self, request: RequestDescriptor) -> Result<RequestDescriptor> {
            self.log.lock().unwrap().push(self.name.to_string());
            Ok(request.header("X-Seen-By", self.name))
        }
    }

    #[async_trait]
    impl ResponseInterceptor for Recorder {
        async fn on_error(&self, _request: &RequestDescriptor, _err: &ApiError) -> Result<()> {
            self.log.lock().unwrap().push(self.name.to_string());
            Ok(())
        }
    }

    struct Rejecting;

    #[async_trait]
    impl RequestInterceptor for Rejecting {
        async fn on_request(&self, _request: RequestDescriptor) -> Result<RequestDescriptor> {
            Err(Error::Other("blocked".to_string()))
        }
    }

    fn unauthorized() -> ApiError {
        ApiError::Status {
            status: 401,
            message: "HTTP 401: Unauthorized".to_string(),
            code: None,
            details: None,
        }
    }

    #[tokio::test]
    async fn test_request_interceptors_run_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = InterceptorChain::new();
        for name in ["first", "second"] {
            chain.add_request(Arc::new(Recorder {
                name,
                log: log.clone(),
            }));
        }

        let request = chain
            .apply_request(RequestDescriptor::get("/assets"))
            .await
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(request.headers.len(), 2);
        assert_eq!(request.headers[1].1, "second");
    }

    #[tokio::test]
    async fn test_failing_interceptor_stops_chain() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = InterceptorChain::new();
        chain.add_request(Arc::new(Rejecting));
        chain.add_request(Arc::new(Recorder {
            name: "after",
            log: log.clone(),
        }));

        let result = chain.apply_request(RequestDescriptor::get("/assets")).await;

        assert!(matches!(result, Err(Error::Other(_))));
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_hooks_do_not_swallow_error() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = InterceptorChain::new();
        chain.add_response(Arc::new(Recorder {
            name: "observer",
            log: log.clone(),
        }));

        let err = chain
            .apply_error(&RequestDescriptor::get("/assets"), unauthorized())
            .await;

        assert!(matches!(err, Error::Api(ApiError::Status { status: 401, .. })));
        assert_eq!(*log.lock().unwrap(), vec!["observer"]);
    }

    #[tokio::test]
    async fn test_unauthorized_handler_only_fires_on_401() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let interceptor = UnauthorizedInterceptor::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let request = RequestDescriptor::get("/incidents");

        interceptor.on_error(&request, &unauthorized()).await.unwrap();
        interceptor
            .on_error(&request, &ApiError::Network("down".to_string()))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
