//! Pause state machine and what it gates.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{setup, setup_with, USD_UNIT};
    use custody_ledger::{CustodyApi, CustodyError};

    #[test]
    fn test_starts_unpaused() {
        let h = setup();
        assert!(!h.service.is_paused());
    }

    #[test]
    fn test_pause_requires_owner() {
        let h = setup();
        let err = h.service.pause(h.users[2]).unwrap_err();
        assert_eq!(err, CustodyError::NotOwner);
        assert!(!h.service.is_paused());
    }

    #[test]
    fn test_unpause_while_unpaused_rejected() {
        let h = setup();
        let err = h.service.unpause(h.owner).unwrap_err();
        assert_eq!(err, CustodyError::NotPaused);
    }

    #[test]
    fn test_pause_then_pause_again_rejected() {
        let h = setup();
        h.service.pause(h.owner).unwrap();
        assert!(h.service.is_paused());

        let err = h.service.pause(h.owner).unwrap_err();
        assert_eq!(err, CustodyError::Paused);
    }

    #[test]
    fn test_deposit_blocked_while_paused() {
        let h = setup();
        h.service.pause(h.owner).unwrap();

        let amount = 100 * USD_UNIT;
        h.service
            .gateway()
            .approve(h.usd_token, h.users[1], h.custody, amount);
        let err = h
            .service
            .deposit(h.users[1], h.usd_token, amount)
            .unwrap_err();
        assert_eq!(err, CustodyError::Paused);
    }

    #[test]
    fn test_withdraw_blocked_while_paused() {
        let h = setup();
        // Allocate something first so the pause gate, not the balance gate,
        // is what rejects.
        let batch = h.batch(8, h.usd_token, &[h.users[1]], &[500 * USD_UNIT], 1);
        h.service.attest(h.owner, batch).unwrap();

        h.service.pause(h.owner).unwrap();
        let err = h.service.withdraw(h.users[1], h.usd_token).unwrap_err();
        assert_eq!(err, CustodyError::Paused);
    }

    #[test]
    fn test_attestation_proceeds_while_paused_by_default() {
        let h = setup();
        h.service.pause(h.owner).unwrap();

        let batch = h.batch(8, h.usd_token, &[h.users[1]], &[500 * USD_UNIT], 2);
        h.service.attest(h.owner, batch).unwrap();
        assert_eq!(
            h.service.available_balance(h.usd_token, h.users[1]),
            500 * USD_UNIT
        );
    }

    #[test]
    fn test_attestation_blocked_when_configured_to_gate() {
        let h = setup_with(|config| config.pause_gates_attestation = true);
        h.service.pause(h.owner).unwrap();

        let batch = h.batch(8, h.usd_token, &[h.users[1]], &[500 * USD_UNIT], 3);
        let err = h.service.attest(h.owner, batch).unwrap_err();
        assert_eq!(err, CustodyError::Paused);
        assert_eq!(h.service.available_balance(h.usd_token, h.users[1]), 0);
    }

    #[test]
    fn test_unpause_restores_operation() {
        let h = setup();
        h.service.pause(h.owner).unwrap();
        h.service.unpause(h.owner).unwrap();
        assert!(!h.service.is_paused());

        h.approve_and_deposit(h.users[1], h.usd_token, 100 * USD_UNIT);
    }
}
