//! Lazily created web billing instance.
//!
//! The web SDK is instance-based and has no logout. The session owns the one
//! live instance: it is created on first use with an anonymous app user ID,
//! re-bound on identify, and replaced by a fresh anonymous instance on
//! logout. Creation is single-flight: concurrent first callers share one
//! instance.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use billing_gateway_sdk::{
    BillingSdkError, CustomerInfo, WebBillingClient, WebBillingConnector, anonymous_app_user_id,
};
use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::info;

use crate::telemetry::LOG_TARGET;

/// Observable session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebSessionState {
    Uninitialized,
    /// An instance is being created and none is live yet.
    Initializing,
    Anonymous { app_user_id: String },
    Identified { app_user_id: String },
}

#[derive(Clone)]
struct WebHandle {
    client: Arc<dyn WebBillingClient>,
    app_user_id: Arc<str>,
    identified: bool,
}

pub struct WebSession {
    connector: Arc<dyn WebBillingConnector>,
    api_key: SecretString,
    /// Live instance (sync lock for the fast path).
    current: RwLock<Option<WebHandle>>,
    /// Serializes instance creation and replacement.
    init_lock: Mutex<()>,
    creating: AtomicBool,
    handles_created: AtomicUsize,
}

/// Marks instance creation in flight until dropped, even if the creating
/// future is cancelled.
struct Creating<'a>(&'a AtomicBool);

impl<'a> Creating<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for Creating<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl WebSession {
    #[must_use]
    pub fn new(connector: Arc<dyn WebBillingConnector>, api_key: SecretString) -> Self {
        Self {
            connector,
            api_key,
            current: RwLock::new(None),
            init_lock: Mutex::new(()),
            creating: AtomicBool::new(false),
            handles_created: AtomicUsize::new(0),
        }
    }

    /// The live instance, created anonymously on first use.
    ///
    /// # Errors
    ///
    /// Returns the connector error if the instance cannot be created. The
    /// session stays uninitialized and the next call tries again.
    pub async fn client(&self) -> Result<Arc<dyn WebBillingClient>, BillingSdkError> {
        if let Some(client) = self.cached_client() {
            return Ok(client);
        }

        let _init_guard = self.init_lock.lock().await;
        self.client_locked().await
    }

    /// Bind the session to `app_user_id`.
    ///
    /// # Errors
    ///
    /// Returns the SDK error if the instance cannot be created or the
    /// backend rejects the identity change. The previous binding is kept.
    pub async fn identify(&self, app_user_id: &str) -> Result<CustomerInfo, BillingSdkError> {
        let _init_guard = self.init_lock.lock().await;
        let client = self.client_locked().await?;

        let info = client.change_user(app_user_id).await?;

        *self.current.write() = Some(WebHandle {
            client,
            app_user_id: app_user_id.into(),
            identified: true,
        });
        info!(target: LOG_TARGET, "web billing session identified");
        Ok(info)
    }

    /// Drop the live instance and start a new anonymous one.
    ///
    /// # Errors
    ///
    /// Returns the connector error if the replacement cannot be created. The
    /// old instance is gone either way; the next call creates a new one.
    pub async fn reset_anonymous(&self) -> Result<(), BillingSdkError> {
        let _init_guard = self.init_lock.lock().await;
        let previous = self.current.write().take();
        drop(previous);

        self.create_anonymous().await?;
        info!(target: LOG_TARGET, "web billing session reset to anonymous");
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> WebSessionState {
        match self.current.read().as_ref() {
            None if self.creating.load(Ordering::SeqCst) => WebSessionState::Initializing,
            None => WebSessionState::Uninitialized,
            Some(handle) if handle.identified => WebSessionState::Identified {
                app_user_id: handle.app_user_id.to_string(),
            },
            Some(handle) => WebSessionState::Anonymous {
                app_user_id: handle.app_user_id.to_string(),
            },
        }
    }

    /// Number of web SDK instances created so far.
    #[must_use]
    pub fn handles_created(&self) -> usize {
        self.handles_created.load(Ordering::SeqCst)
    }

    fn cached_client(&self) -> Option<Arc<dyn WebBillingClient>> {
        self.current
            .read()
            .as_ref()
            .map(|handle| Arc::clone(&handle.client))
    }

    /// Caller holds `init_lock`.
    async fn client_locked(&self) -> Result<Arc<dyn WebBillingClient>, BillingSdkError> {
        if let Some(client) = self.cached_client() {
            return Ok(client);
        }
        self.create_anonymous().await
    }

    /// Caller holds `init_lock`.
    async fn create_anonymous(&self) -> Result<Arc<dyn WebBillingClient>, BillingSdkError> {
        let app_user_id = anonymous_app_user_id();
        info!(target: LOG_TARGET, "creating web billing instance");

        let _creating = Creating::start(&self.creating);
        let client = self
            .connector
            .configure(self.api_key.expose_secret(), &app_user_id)
            .await?;
        self.handles_created.fetch_add(1, Ordering::SeqCst);

        *self.current.write() = Some(WebHandle {
            client: Arc::clone(&client),
            app_user_id: app_user_id.into(),
            identified: false,
        });
        Ok(client)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use billing_gateway_sdk::{WebOfferings, WebPurchaseParams, WebPurchaseResult};
    use std::time::Duration;

    struct SlowConnector;

    struct BoundClient(String);

    #[async_trait]
    impl WebBillingConnector for SlowConnector {
        async fn configure(
            &self,
            _api_key: &str,
            app_user_id: &str,
        ) -> Result<Arc<dyn WebBillingClient>, BillingSdkError> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(Arc::new(BoundClient(app_user_id.to_owned())))
        }
    }

    #[async_trait]
    impl WebBillingClient for BoundClient {
        async fn get_offerings(&self) -> Result<WebOfferings, BillingSdkError> {
            Ok(WebOfferings::default())
        }

        async fn purchase(&self, _params: WebPurchaseParams) -> Result<WebPurchaseResult, BillingSdkError> {
            Err(BillingSdkError::PurchaseCancelled)
        }

        async fn get_customer_info(&self) -> Result<CustomerInfo, BillingSdkError> {
            Ok(CustomerInfo::empty(self.0.clone()))
        }

        async fn change_user(&self, app_user_id: &str) -> Result<CustomerInfo, BillingSdkError> {
            Ok(CustomerInfo::empty(app_user_id))
        }
    }

    /// Holds `configure` until released.
    struct GatedConnector(Arc<tokio::sync::Notify>);

    #[async_trait]
    impl WebBillingConnector for GatedConnector {
        async fn configure(
            &self,
            _api_key: &str,
            app_user_id: &str,
        ) -> Result<Arc<dyn WebBillingClient>, BillingSdkError> {
            self.0.notified().await;
            Ok(Arc::new(BoundClient(app_user_id.to_owned())))
        }
    }

    fn session() -> Arc<WebSession> {
        Arc::new(WebSession::new(Arc::new(SlowConnector), "rcb_key".into()))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_share_one_instance() {
        let session = session();

        let tasks: Vec<_> = (0..6)
            .map(|_| {
                let session = session.clone();
                tokio::spawn(async move { session.client().await.map(|_| ()) })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(session.handles_created(), 1);
        assert!(matches!(session.state(), WebSessionState::Anonymous { .. }));
    }

    #[tokio::test]
    async fn identify_then_reset_walks_the_state_machine() {
        let session = session();
        assert_eq!(session.state(), WebSessionState::Uninitialized);

        session.identify("alice").await.unwrap();
        assert_eq!(
            session.state(),
            WebSessionState::Identified {
                app_user_id: "alice".to_owned()
            }
        );

        session.reset_anonymous().await.unwrap();
        assert!(matches!(session.state(), WebSessionState::Anonymous { .. }));
        assert_eq!(session.handles_created(), 2);
    }

    #[tokio::test]
    async fn state_is_initializing_while_creation_is_in_flight() {
        let gate = Arc::new(tokio::sync::Notify::new());
        let session = Arc::new(WebSession::new(
            Arc::new(GatedConnector(gate.clone())),
            "rcb_key".into(),
        ));

        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.client().await.map(|_| ()) }
        });
        while session.state() != WebSessionState::Initializing {
            tokio::task::yield_now().await;
        }

        gate.notify_one();
        pending.await.unwrap().unwrap();
        assert!(matches!(session.state(), WebSessionState::Anonymous { .. }));
    }

    #[tokio::test]
    async fn cancelled_creation_leaves_the_session_uninitialized() {
        let session = WebSession::new(
            Arc::new(GatedConnector(Arc::new(tokio::sync::Notify::new()))),
            "rcb_key".into(),
        );

        let timed_out = tokio::time::timeout(Duration::from_millis(10), session.client()).await;

        assert!(timed_out.is_err());
        assert_eq!(session.state(), WebSessionState::Uninitialized);
        assert_eq!(session.handles_created(), 0);
    }
}
