//! # Checkout Flow
//!
//! Orchestrates the payment handoff: validate, generate an order
//! reference, request initiation from the gateway. The processing flag
//! guards against double submission and is released on every exit
//! path, success or failure.

use cart_core::{
    generate_order_reference, BoxedPaymentGateway, CartState, CheckoutError, CheckoutResult,
    CustomerDetails, InitiationRequest, PaymentInitiation,
};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, instrument};

/// Prefix for client-generated order correlation ids
pub const ORDER_REFERENCE_PREFIX: &str = "ORDER";

/// RAII release of the processing flag
struct ProcessingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> CheckoutResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CheckoutError::AlreadyProcessing)?;
        Ok(Self { flag })
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// One checkout flow bound to a gateway, for one session
pub struct CheckoutFlow {
    gateway: BoxedPaymentGateway,
    processing: AtomicBool,
}

impl CheckoutFlow {
    pub fn new(gateway: BoxedPaymentGateway) -> Self {
        Self {
            gateway,
            processing: AtomicBool::new(false),
        }
    }

    /// Whether a checkout is currently in flight
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Run the handoff: validation first (no network call on a bad
    /// cart), then gateway initiation for the cart's grand total.
    #[instrument(skip(self, cart, customer), fields(gateway = self.gateway.gateway_name()))]
    pub async fn execute(
        &self,
        cart: &CartState,
        customer: &CustomerDetails,
    ) -> CheckoutResult<PaymentInitiation> {
        let _guard = ProcessingGuard::acquire(&self.processing)?;

        if cart.is_empty() {
            return Err(CheckoutError::Validation(
                "Cannot check out an empty cart".to_string(),
            ));
        }
        customer.validate()?;

        let order_id = generate_order_reference(ORDER_REFERENCE_PREFIX);
        info!(
            "Starting checkout: order_id={}, items={}, total={}",
            order_id,
            cart.item_count(),
            cart.grand_total
        );

        let request = InitiationRequest::new(order_id, cart.grand_total)
            .with_description(format!("Order of {} item(s)", cart.item_count()))
            .with_customer(customer.name.clone());

        self.gateway.initiate(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cart_core::{CartItem, CartStore, PaymentGateway};
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;
    use std::time::Duration;

    struct StubGateway {
        calls: AtomicU32,
        delay: Duration,
    }

    impl StubGateway {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                delay: Duration::ZERO,
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                delay,
            })
        }
    }

    #[async_trait]
    impl PaymentGateway for StubGateway {
        async fn initiate(
            &self,
            request: &InitiationRequest,
        ) -> CheckoutResult<PaymentInitiation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(PaymentInitiation {
                order_id: request.order_id.clone(),
                amount_rands: request.amount_rands,
                endpoint: "https://secure.paygate.co.za/paypage".into(),
                fields: vec![("REFERENCE".into(), request.order_id.clone())],
                signature: Some("deadbeef".into()),
                signature_method: Some("HMAC-SHA256".into()),
            })
        }

        fn gateway_name(&self) -> &'static str {
            "stub"
        }
    }

    fn filled_cart() -> CartState {
        let mut store = CartStore::new();
        store.add_item(CartItem {
            id: "cr-001".into(),
            name: "Heat Rub 50ml".into(),
            unit_price: 249.0,
            quantity: 1,
            image_url: String::new(),
        });
        store.state().clone()
    }

    fn customer() -> CustomerDetails {
        CustomerDetails {
            name: "Thandi Nkosi".into(),
            email: "thandi@example.co.za".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_execute_charges_the_grand_total() {
        let gateway = StubGateway::new();
        let flow = CheckoutFlow::new(gateway.clone());

        let initiation = flow.execute(&filled_cart(), &customer()).await.unwrap();
        assert_eq!(initiation.amount_rands, 348.0); // 249 + 99 standard
        assert!(initiation.order_id.starts_with("ORDER_"));
        assert!(!flow.is_processing());
    }

    #[tokio::test]
    async fn test_empty_cart_fails_before_any_gateway_call() {
        let gateway = StubGateway::new();
        let flow = CheckoutFlow::new(gateway.clone());

        let err = flow.execute(&CartState::new(), &customer()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(_)));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_customer_fields_fail_fast() {
        let gateway = StubGateway::new();
        let flow = CheckoutFlow::new(gateway.clone());

        let err = flow
            .execute(&filled_cart(), &CustomerDetails::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(_)));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_processing_flag_released_after_failure() {
        let flow = CheckoutFlow::new(StubGateway::new());

        let _ = flow.execute(&CartState::new(), &customer()).await;
        assert!(!flow.is_processing());

        // A retry after failure goes through
        let retry = flow.execute(&filled_cart(), &customer()).await;
        assert!(retry.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_checkout_is_rejected() {
        let flow = Arc::new(CheckoutFlow::new(StubGateway::slow(Duration::from_millis(
            100,
        ))));

        let first = {
            let flow = flow.clone();
            tokio::spawn(async move { flow.execute(&filled_cart(), &customer()).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let second = flow.execute(&filled_cart(), &customer()).await;
        assert!(matches!(second, Err(CheckoutError::AlreadyProcessing)));

        assert!(first.await.unwrap().is_ok());
        assert!(!flow.is_processing());
    }
}
