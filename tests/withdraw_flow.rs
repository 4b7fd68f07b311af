//! End-to-end tests of the withdrawal flow against a scripted gateway.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use tokio::sync::Notify;

use withdraw_portal::blockchain::types::ChainResult;
use withdraw_portal::session::{AccountKind, LinkedAccount, Session, SessionError};
use withdraw_portal::withdraw::{
    FlowSettings, WithdrawError, WithdrawFlow, WithdrawGateway, WithdrawView,
};

const OWNER: &str = "0x1111111111111111111111111111111111111111";
const DEST: &str = "0x000000000000000000000000000000000000dEaD";
const TOKEN: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
const HASH: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

struct MockGateway {
    session: Session,
    chain_id: u64,
    balance: Mutex<U256>,
    decimals: u8,
    balance_reads: AtomicUsize,
    sent: Mutex<Vec<Bytes>>,
    reject_send: bool,
    /// Balance the mock reports after a transfer goes through.
    post_send_balance: Option<U256>,
    /// When set, the receipt wait blocks until notified.
    receipt_gate: Option<Arc<Notify>>,
}

impl MockGateway {
    fn new(session: Session, chain_id: u64, balance: u64, decimals: u8) -> Self {
        Self {
            session,
            chain_id,
            balance: Mutex::new(U256::from(balance)),
            decimals,
            balance_reads: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
            reject_send: false,
            post_send_balance: Some(U256::ZERO),
            receipt_gate: None,
        }
    }

    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl WithdrawGateway for MockGateway {
    async fn session(&self) -> Result<Session, SessionError> {
        Ok(self.session.clone())
    }

    async fn active_chain_id(&self) -> ChainResult<u64> {
        Ok(self.chain_id)
    }

    async fn token_balance(&self, _owner: Address) -> ChainResult<U256> {
        self.balance_reads.fetch_add(1, Ordering::SeqCst);
        Ok(*self.balance.lock().unwrap())
    }

    async fn token_decimals(&self) -> ChainResult<u8> {
        Ok(self.decimals)
    }

    async fn send_transfer(&self, _from: Address, data: Bytes) -> Result<TxHash, SessionError> {
        if self.reject_send {
            return Err(SessionError::Api {
                status: 400,
                message: "user rejected".to_string(),
            });
        }
        self.sent.lock().unwrap().push(data);
        if let Some(next) = self.post_send_balance {
            *self.balance.lock().unwrap() = next;
        }
        Ok(HASH.parse().unwrap())
    }

    async fn wait_for_receipt(&self, _hash: TxHash) -> ChainResult<u64> {
        if let Some(gate) = &self.receipt_gate {
            gate.notified().await;
        }
        Ok(100)
    }
}

fn smart_session() -> Session {
    Session {
        ready: true,
        authenticated: true,
        linked_accounts: vec![LinkedAccount {
            kind: AccountKind::SmartWallet,
            address: OWNER.parse().unwrap(),
        }],
    }
}

fn plain_wallet_session() -> Session {
    Session {
        ready: true,
        authenticated: true,
        linked_accounts: vec![LinkedAccount {
            kind: AccountKind::Wallet,
            address: OWNER.parse().unwrap(),
        }],
    }
}

fn settings() -> FlowSettings {
    FlowSettings {
        symbol: "USDT".to_string(),
        token: TOKEN.parse().unwrap(),
        destination: DEST.parse().unwrap(),
        default_decimals: 6,
        required_chain_id: 1,
    }
}

fn flow_over(gateway: MockGateway) -> (Arc<WithdrawFlow>, Arc<MockGateway>) {
    let gateway = Arc::new(gateway);
    let flow = Arc::new(WithdrawFlow::new(
        gateway.clone() as Arc<dyn WithdrawGateway>,
        settings(),
    ));
    (flow, gateway)
}

fn form(view: WithdrawView) -> withdraw_portal::withdraw::view::WithdrawForm {
    match view {
        WithdrawView::Form(form) => form,
        WithdrawView::SwitchNetwork(notice) => {
            panic!("expected form, got switch-network notice: {:?}", notice)
        }
    }
}

#[tokio::test]
async fn refresh_autofills_full_balance() {
    let (flow, _) = flow_over(MockGateway::new(smart_session(), 1, 1_500_000, 6));
    flow.refresh().await.unwrap();

    let form = form(flow.view());
    assert_eq!(form.amount, "1.5");
    assert_eq!(form.available, "1.5");
    assert!(form.can_submit);
    assert!(!form.processing);
}

#[tokio::test]
async fn wrong_network_blocks_everything() {
    let (flow, gateway) = flow_over(MockGateway::new(smart_session(), 137, 1_500_000, 6));
    flow.refresh().await.unwrap();

    match flow.view() {
        WithdrawView::SwitchNetwork(notice) => {
            assert_eq!(notice.current_chain_id, 137);
            assert_eq!(notice.required_chain_id, 1);
        }
        WithdrawView::Form(_) => panic!("form must not render off the required chain"),
    }

    let err = flow.submit().await.unwrap_err();
    assert!(matches!(
        err,
        WithdrawError::WrongNetwork {
            current: 137,
            required: 1
        }
    ));
    assert_eq!(gateway.sent_count(), 0);
}

#[tokio::test]
async fn empty_amount_is_rejected_without_side_effects() {
    let (flow, gateway) = flow_over(MockGateway::new(smart_session(), 1, 1_500_000, 6));
    // No refresh: amount was never auto-filled.
    let err = flow.submit().await.unwrap_err();
    assert!(matches!(err, WithdrawError::EmptyAmount));
    assert_eq!(gateway.sent_count(), 0);
    assert!(!form(flow.view()).processing);
}

#[tokio::test]
async fn plain_wallet_cannot_submit() {
    let (flow, gateway) = flow_over(MockGateway::new(plain_wallet_session(), 1, 1_500_000, 6));
    flow.refresh().await.unwrap();

    assert!(!form(flow.view()).can_submit);
    let err = flow.submit().await.unwrap_err();
    assert!(matches!(err, WithdrawError::NotSmartWallet));
    assert_eq!(gateway.sent_count(), 0);
}

#[tokio::test]
async fn unauthenticated_session_has_no_account() {
    let (flow, _) = flow_over(MockGateway::new(Session::default(), 1, 0, 6));
    let err = flow.submit().await.unwrap_err();
    assert!(matches!(err, WithdrawError::NoAccount));
}

#[tokio::test]
async fn successful_withdrawal_encodes_transfer_and_refetches_once() {
    let (flow, gateway) = flow_over(MockGateway::new(smart_session(), 1, 1_500_000, 6));
    flow.refresh().await.unwrap();
    let reads_before = gateway.balance_reads.load(Ordering::SeqCst);

    let hash = flow.submit().await.unwrap();
    assert_eq!(hash, HASH.parse::<TxHash>().unwrap());

    // Exactly one transfer, with the destination and the full balance.
    let sent = gateway.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    let data = &sent[0];
    assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
    let dest: Address = DEST.parse().unwrap();
    assert_eq!(&data[16..36], dest.as_slice());
    assert_eq!(U256::from_be_slice(&data[36..68]), U256::from(1_500_000u64));

    // Exactly one balance refetch after confirmation.
    assert_eq!(gateway.balance_reads.load(Ordering::SeqCst), reads_before + 1);

    // The refetched balance is zero, so the amount stays empty.
    let form = form(flow.view());
    assert_eq!(form.amount, "");
    assert!(!form.can_submit);
    assert!(!form.processing);
    let tx = form.transaction.expect("confirmed hash displayed");
    assert!(tx.confirmed);
    assert!(tx.hash_display.contains("..."));
    assert_eq!(
        tx.explorer_url.as_deref(),
        Some(format!("https://etherscan.io/tx/{}", HASH).as_str())
    );
}

#[tokio::test]
async fn drained_wallet_cannot_resubmit_zero_value_transfer() {
    let (flow, gateway) = flow_over(MockGateway::new(smart_session(), 1, 1_500_000, 6));
    flow.refresh().await.unwrap();
    flow.submit().await.unwrap();
    assert_eq!(gateway.sent_count(), 1);

    // Refreshing against the drained wallet must not fill the amount.
    flow.refresh().await.unwrap();
    let form_after = form(flow.view());
    assert_eq!(form_after.amount, "");
    assert!(!form_after.can_submit);

    let err = flow.submit().await.unwrap_err();
    assert!(matches!(err, WithdrawError::EmptyAmount));
    assert_eq!(gateway.sent_count(), 1);
}

#[tokio::test]
async fn rejected_submission_surfaces_error_and_keeps_amount() {
    let mut gateway = MockGateway::new(smart_session(), 1, 1_500_000, 6);
    gateway.reject_send = true;
    let (flow, _) = flow_over(gateway);
    flow.refresh().await.unwrap();

    let err = flow.submit().await.unwrap_err();
    assert!(matches!(err, WithdrawError::Session(_)));

    let form = form(flow.view());
    // Pre-action state except the loading flag.
    assert_eq!(form.amount, "1.5");
    assert!(!form.processing);
    assert!(form.transaction.is_none());
    assert!(form.error.unwrap().contains("user rejected"));
}

#[tokio::test]
async fn second_submission_while_in_flight_is_refused() {
    let gate = Arc::new(Notify::new());
    let mut gateway = MockGateway::new(smart_session(), 1, 1_500_000, 6);
    gateway.receipt_gate = Some(gate.clone());
    let (flow, mock) = flow_over(gateway);
    flow.refresh().await.unwrap();

    let first = tokio::spawn({
        let flow = flow.clone();
        async move { flow.submit().await }
    });

    // Let the first submission reach the receipt wait.
    while mock.sent_count() == 0 {
        tokio::task::yield_now().await;
    }
    assert!(form(flow.view()).processing);

    let err = flow.submit().await.unwrap_err();
    assert!(matches!(err, WithdrawError::Busy));

    gate.notify_one();
    first.await.unwrap().unwrap();
    assert_eq!(mock.sent_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn confirmed_hash_clears_after_display_window() {
    let (flow, _) = flow_over(MockGateway::new(smart_session(), 1, 1_500_000, 6));
    flow.refresh().await.unwrap();
    flow.submit().await.unwrap();
    // Let the clear timer register its sleep before moving the clock.
    tokio::task::yield_now().await;

    assert!(form(flow.view()).transaction.is_some());

    tokio::time::advance(Duration::from_secs(9)).await;
    tokio::task::yield_now().await;
    assert!(
        form(flow.view()).transaction.is_some(),
        "hash must not clear before the 10s window"
    );

    tokio::time::advance(Duration::from_secs(2)).await;
    tokio::task::yield_now().await;
    assert!(
        form(flow.view()).transaction.is_none(),
        "hash must clear shortly after the 10s window"
    );
}

#[tokio::test(start_paused = true)]
async fn new_submission_supersedes_pending_clear_timer() {
    let mut gateway = MockGateway::new(smart_session(), 1, 1_500_000, 6);
    // Keep a balance around so a second withdrawal is possible.
    gateway.post_send_balance = Some(U256::from(2_000_000u64));
    let (flow, _) = flow_over(gateway);
    flow.refresh().await.unwrap();
    flow.submit().await.unwrap();
    // Let the clear timer register its sleep before moving the clock.
    tokio::task::yield_now().await;

    tokio::time::advance(Duration::from_secs(8)).await;
    tokio::task::yield_now().await;

    // Second submission restarts the window.
    flow.submit().await.unwrap();
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_secs(4)).await;
    tokio::task::yield_now().await;
    assert!(
        form(flow.view()).transaction.is_some(),
        "the first timer must not clear the second hash"
    );

    tokio::time::advance(Duration::from_secs(7)).await;
    tokio::task::yield_now().await;
    assert!(form(flow.view()).transaction.is_none());
}
