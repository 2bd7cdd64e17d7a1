//! End-to-end lifecycle tests for the job escrow platform.
//!
//! Drives complete job lifecycles through the engine and checks the
//! funds-safety properties at every step:
//! 1. Posting escrows exactly the payment
//! 2. One freelancer claims the job
//! 3. Completion moves no money
//! 4. Release pays exactly the posted amount, exactly once

use gig_core::{Address, Amount, JobStatus};
use gig_engine::{EngineError, FixedRateOracle, JobEscrowEngine, UsdAmount};
use gig_ledger::{HoldState, InMemoryBank};

// ============================================================================
// Helper Functions
// ============================================================================

fn addr(byte: u8) -> Address {
    Address::from_bytes(&[byte; 20])
}

fn engine_with_funds(
    employer: &Address,
    funds: Amount,
) -> JobEscrowEngine<InMemoryBank, FixedRateOracle> {
    let bank = InMemoryBank::new();
    bank.deposit(employer, funds);
    JobEscrowEngine::new(bank, FixedRateOracle::new(250_000))
}

// ============================================================================
// Happy Path
// ============================================================================

#[tokio::test]
async fn full_lifecycle_pays_posted_amount_exactly_once() {
    let employer = addr(0xaa);
    let freelancer = addr(0xbb);
    let engine = engine_with_funds(&employer, Amount::eth(5.0));

    // Employer posts a job with payment 2.0; the hold is recorded.
    let job = engine
        .post_job(&employer, "Landing page", "Build the landing page", Amount::eth(2.0))
        .await
        .expect("post");
    assert_eq!(job.status, JobStatus::Open);
    assert_eq!(engine.ledger().held(job.id), Some(Amount::eth(2.0)));
    assert_eq!(engine.ledger().backend().balance(&employer), Amount::eth(3.0));

    // Freelancer applies and is recorded.
    let job = engine.apply_to_job(&freelancer, job.id).await.expect("apply");
    assert_eq!(job.status, JobStatus::Assigned);
    assert_eq!(job.freelancer, Some(freelancer.clone()));

    // Employer acknowledges completion; no money moves yet.
    let job = engine.complete_job(&employer, job.id).await.expect("complete");
    assert_eq!(job.status, JobStatus::Completed);
    assert!(engine.ledger().backend().balance(&freelancer).is_zero());
    assert_eq!(engine.ledger().held(job.id), Some(Amount::eth(2.0)));

    // Release transfers 2.0 to the freelancer.
    let job = engine.release_payment(&employer, job.id).await.expect("release");
    assert_eq!(job.status, JobStatus::Released);
    assert_eq!(engine.ledger().backend().balance(&freelancer), Amount::eth(2.0));
    assert_eq!(
        engine.ledger().entry(job.id).map(|e| e.state),
        Some(HoldState::Released)
    );

    // A second release fails and balances are unchanged.
    let replay = engine.release_payment(&employer, job.id).await;
    assert!(matches!(replay, Err(EngineError::AlreadyReleased { .. })));
    assert_eq!(engine.ledger().backend().balance(&freelancer), Amount::eth(2.0));
    assert_eq!(engine.ledger().backend().balance(&employer), Amount::eth(3.0));
    assert!(engine.ledger().total_locked().is_zero());
}

#[tokio::test]
async fn complete_and_release_are_independent_steps() {
    let employer = addr(0xaa);
    let freelancer = addr(0xbb);
    let engine = engine_with_funds(&employer, Amount::eth(5.0));

    let job = engine
        .post_job(&employer, "Logo", "Design a logo", Amount::eth(1.0))
        .await
        .expect("post");
    engine.apply_to_job(&freelancer, job.id).await.expect("apply");

    // Releasing before completion is rejected.
    let early = engine.release_payment(&employer, job.id).await;
    assert!(matches!(
        early,
        Err(EngineError::InvalidState {
            current: JobStatus::Assigned,
            ..
        })
    ));

    // Completing acknowledges work without paying.
    engine.complete_job(&employer, job.id).await.expect("complete");
    let mid = engine.get_job(job.id).await.expect("get");
    assert_eq!(mid.status, JobStatus::Completed);
    assert!(engine.ledger().backend().balance(&freelancer).is_zero());

    // Completing again is rejected; the job can still be released.
    let twice = engine.complete_job(&employer, job.id).await;
    assert!(matches!(twice, Err(EngineError::InvalidState { .. })));

    engine.release_payment(&employer, job.id).await.expect("release");
    assert_eq!(engine.ledger().backend().balance(&freelancer), Amount::eth(1.0));
}

// ============================================================================
// Rejections
// ============================================================================

#[tokio::test]
async fn zero_payment_posting_leaves_no_trace() {
    let employer = addr(0xaa);
    let engine = engine_with_funds(&employer, Amount::eth(5.0));

    let result = engine
        .post_job(&employer, "Free work", "please", Amount::ZERO)
        .await;
    assert!(matches!(result, Err(EngineError::InvalidInput { .. })));

    assert_eq!(engine.job_count(), 0);
    assert!(engine.list_jobs().await.is_empty());
    assert!(engine.ledger().total_locked().is_zero());
    assert_eq!(engine.ledger().backend().balance(&employer), Amount::eth(5.0));
}

#[tokio::test]
async fn apply_to_assigned_job_leaves_job_unchanged() {
    let employer = addr(0xaa);
    let first = addr(0xbb);
    let second = addr(0xcc);
    let engine = engine_with_funds(&employer, Amount::eth(5.0));

    let job = engine
        .post_job(&employer, "Title", "Desc", Amount::eth(1.0))
        .await
        .expect("post");
    engine.apply_to_job(&first, job.id).await.expect("first claim");

    let late = engine.apply_to_job(&second, job.id).await;
    assert!(matches!(
        late,
        Err(EngineError::InvalidState {
            current: JobStatus::Assigned,
            ..
        })
    ));

    let job = engine.get_job(job.id).await.expect("get");
    assert_eq!(job.freelancer, Some(first));
    assert_eq!(job.status, JobStatus::Assigned);
}

#[tokio::test]
async fn self_dealing_is_always_forbidden() {
    let employer = addr(0xaa);
    let engine = engine_with_funds(&employer, Amount::eth(5.0));

    let job = engine
        .post_job(&employer, "Title", "Desc", Amount::eth(1.0))
        .await
        .expect("post");

    let result = engine.apply_to_job(&employer, job.id).await;
    assert!(matches!(result, Err(EngineError::Forbidden { .. })));

    // Mixed-case input normalizes to the same identity and is still caught.
    let mixed = Address::parse(&employer.as_str().to_uppercase().replace("0X", "0x"))
        .expect("parse");
    let result = engine.apply_to_job(&mixed, job.id).await;
    assert!(matches!(result, Err(EngineError::Forbidden { .. })));
}

// ============================================================================
// Funds Conservation
// ============================================================================

#[tokio::test]
async fn payouts_match_posted_amounts_across_many_jobs() {
    let employer = addr(0xaa);
    let engine = engine_with_funds(&employer, Amount::eth(100.0));
    let initial_total = engine.ledger().backend().total_balance();

    let payments = [0.5, 1.0, 2.5, 4.0];
    for (n, eth) in payments.iter().enumerate() {
        let freelancer = addr(0xb0 + n as u8);
        let payment = Amount::eth(*eth);

        let job = engine
            .post_job(&employer, format!("Job {n}").as_str(), "work", payment)
            .await
            .expect("post");
        engine.apply_to_job(&freelancer, job.id).await.expect("apply");
        engine.complete_job(&employer, job.id).await.expect("complete");
        engine.release_payment(&employer, job.id).await.expect("release");

        // Each payout equals the posted amount exactly.
        assert_eq!(engine.ledger().backend().balance(&freelancer), payment);
    }

    // Money only changed hands; none was created or destroyed.
    assert_eq!(engine.ledger().backend().total_balance(), initial_total);
    assert!(engine.ledger().total_locked().is_zero());
}

// ============================================================================
// Quoting
// ============================================================================

#[tokio::test]
async fn quote_converts_without_touching_state() {
    let employer = addr(0xaa);
    let engine = engine_with_funds(&employer, Amount::eth(5.0));

    let job = engine
        .post_job(&employer, "Title", "Desc", Amount::eth(2.0))
        .await
        .expect("post");

    // $2,500.00/ETH fixed rate: 2 ETH quotes as $5,000.00.
    let quoted = engine.quote(job.payment).await.expect("quote");
    assert_eq!(quoted, UsdAmount::from_cents(500_000));
    assert_eq!(quoted.to_string(), "$5000.00");

    let after = engine.get_job(job.id).await.expect("get");
    assert_eq!(after.status, JobStatus::Open);
    assert_eq!(engine.ledger().held(job.id), Some(Amount::eth(2.0)));
}
