//! Settlement engine - the financial reconciliation between the two payers.
//!
//! Everything in here is a pure function over an already-filtered slice of
//! gift records: no I/O, no errors, same input always yields the same
//! summary. Returned and excluded gifts are skipped before any accumulation,
//! so they contribute to neither the totals nor the per-recipient breakdown.

use crate::entities::{Payer, Recipient, gift};
use sea_orm::Iterable;
use std::collections::HashMap;

/// Per-recipient aggregation over the included gifts.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipientStat {
    /// The recipient this row is about
    pub recipient: Recipient,
    /// Number of included gifts for this recipient
    pub count: u32,
    /// Summed sticker price of those gifts
    pub value: f64,
}

/// The complete financial reconciliation between the two payers.
///
/// `total_paolo_paid + total_mary_paid` always equals `total_spent`: every
/// spent unit is attributed to exactly one payer, even after a repayment
/// redistributes ownership of a cost.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialSummary {
    /// Sum of cost over all gifts that are neither returned nor excluded
    pub total_spent: f64,
    /// Paolo's net cash outlay after repayment redistribution
    pub total_paolo_paid: f64,
    /// Mary's net cash outlay after repayment redistribution
    pub total_mary_paid: f64,
    /// Mary's unsettled half-shares of Paolo's split purchases
    pub mary_owes_paolo: f64,
    /// Paolo's unsettled half-shares of Mary's split purchases
    pub paolo_owes_mary: f64,
    /// `mary_owes_paolo - paolo_owes_mary`; positive means Mary owes Paolo
    pub net_settlement: f64,
    /// One entry per recipient in declaration order, zero-filled when absent
    pub recipient_stats: Vec<RecipientStat>,
}

/// Computes the financial summary for a slice of gift records.
///
/// The input is expected to be the output of the filter stage: soft-deleted
/// records and records outside the active filter are already gone. Returned
/// and excluded records may still be present (they stay visible in the list)
/// and are skipped here.
///
/// Per included gift:
/// - the full cost goes into `total_spent`;
/// - if the payer was repaid, ownership of the repaid share moves to the
///   other payer's paid total and no outstanding debt is recorded;
/// - otherwise the payer's paid total takes the full cost, and half of it
///   becomes outstanding debt of the other payer when the gift is split;
/// - the recipient's count and value accumulate the sticker price,
///   regardless of who paid or how the cost is shared.
#[must_use]
pub fn compute_summary(gifts: &[gift::Model]) -> FinancialSummary {
    let mut total_spent = 0.0;
    let mut total_paolo_paid = 0.0;
    let mut total_mary_paid = 0.0;
    let mut mary_owes_paolo = 0.0;
    let mut paolo_owes_mary = 0.0;
    let mut per_recipient: HashMap<Recipient, (u32, f64)> = HashMap::new();

    for gift in gifts {
        if gift.is_returned || gift.is_excluded {
            continue;
        }

        total_spent += gift.cost;

        match gift.payer {
            Payer::Paolo => {
                if gift.is_repaid {
                    // The split has already been settled in cash: redistribute
                    // ownership of the cost instead of recording a debt.
                    let repaid_amount = if gift.is_split {
                        gift.cost / 2.0
                    } else {
                        gift.cost
                    };
                    total_paolo_paid += gift.cost - repaid_amount;
                    total_mary_paid += repaid_amount;
                } else {
                    total_paolo_paid += gift.cost;
                    if gift.is_split {
                        mary_owes_paolo += gift.cost / 2.0;
                    }
                }
            }
            Payer::Mary => {
                if gift.is_repaid {
                    let repaid_amount = if gift.is_split {
                        gift.cost / 2.0
                    } else {
                        gift.cost
                    };
                    total_mary_paid += gift.cost - repaid_amount;
                    total_paolo_paid += repaid_amount;
                } else {
                    total_mary_paid += gift.cost;
                    if gift.is_split {
                        paolo_owes_mary += gift.cost / 2.0;
                    }
                }
            }
        }

        let entry = per_recipient.entry(gift.recipient).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += gift.cost;
    }

    // Every recipient gets a row, zero-filled when nothing matched.
    let recipient_stats = Recipient::iter()
        .map(|recipient| {
            let (count, value) = per_recipient.get(&recipient).copied().unwrap_or((0, 0.0));
            RecipientStat {
                recipient,
                count,
                value,
            }
        })
        .collect();

    FinancialSummary {
        total_spent,
        total_paolo_paid,
        total_mary_paid,
        mary_owes_paolo,
        paolo_owes_mary,
        net_settlement: mary_owes_paolo - paolo_owes_mary,
        recipient_stats,
    }
}

/// Formats a monetary amount in euros, like `€50.00`.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("€{amount:.2}")
}

/// Renders the net settlement as a human verdict.
///
/// Positive net means Mary owes Paolo; negative means Paolo owes Mary;
/// anything under half a cent counts as settled.
#[must_use]
pub fn format_settlement_verdict(summary: &FinancialSummary) -> String {
    let net = summary.net_settlement;
    if net > 0.005 {
        format!("Mary owes Paolo {}", format_amount(net))
    } else if net < -0.005 {
        format!("Paolo owes Mary {}", format_amount(net.abs()))
    } else {
        "All settled".to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::entities::Occasion;
    use crate::test_utils::gift_model;

    #[test]
    fn test_empty_list_is_all_zero() {
        let summary = compute_summary(&[]);
        assert_eq!(summary.total_spent, 0.0);
        assert_eq!(summary.total_paolo_paid, 0.0);
        assert_eq!(summary.total_mary_paid, 0.0);
        assert_eq!(summary.net_settlement, 0.0);
        assert_eq!(summary.recipient_stats.len(), 6);
        assert!(summary.recipient_stats.iter().all(|s| s.count == 0));
    }

    #[test]
    fn test_split_and_unsplit_gifts_by_paolo() {
        // Two gifts, both cost 100, payer Paolo, one split and one not.
        let split = gift_model("g1", 100.0, Payer::Paolo, Recipient::Jacopo, |g| {
            g.is_split = true;
        });
        let unsplit = gift_model("g2", 100.0, Payer::Paolo, Recipient::Jacopo, |_| {});

        let summary = compute_summary(&[split, unsplit]);
        assert_eq!(summary.total_spent, 200.0);
        assert_eq!(summary.total_paolo_paid, 200.0);
        assert_eq!(summary.total_mary_paid, 0.0);
        assert_eq!(summary.mary_owes_paolo, 50.0);
        assert_eq!(summary.paolo_owes_mary, 0.0);
        assert_eq!(summary.net_settlement, 50.0);
    }

    #[test]
    fn test_repaid_split_redistributes_without_debt() {
        // One gift cost 60, payer Mary, split and already repaid.
        let gift = gift_model("g1", 60.0, Payer::Mary, Recipient::Anna, |g| {
            g.is_split = true;
            g.is_repaid = true;
        });

        let summary = compute_summary(&[gift]);
        assert_eq!(summary.total_mary_paid, 30.0);
        assert_eq!(summary.total_paolo_paid, 30.0);
        assert_eq!(summary.mary_owes_paolo, 0.0);
        assert_eq!(summary.paolo_owes_mary, 0.0);
        assert_eq!(summary.net_settlement, 0.0);
        assert_eq!(summary.total_spent, 60.0);
    }

    #[test]
    fn test_repaid_unsplit_moves_full_cost_to_other_payer() {
        // Repaid without split: the whole cost was reimbursed.
        let gift = gift_model("g1", 80.0, Payer::Paolo, Recipient::Mary, |g| {
            g.is_repaid = true;
        });

        let summary = compute_summary(&[gift]);
        assert_eq!(summary.total_paolo_paid, 0.0);
        assert_eq!(summary.total_mary_paid, 80.0);
        assert_eq!(summary.net_settlement, 0.0);
    }

    #[test]
    fn test_returned_gift_is_skipped_entirely() {
        let returned = gift_model("g1", 40.0, Payer::Paolo, Recipient::Leonardo, |g| {
            g.is_returned = true;
            g.is_split = true;
        });
        let kept = gift_model("g2", 10.0, Payer::Mary, Recipient::Leonardo, |_| {});

        let summary = compute_summary(&[returned, kept]);
        assert_eq!(summary.total_spent, 10.0);
        assert_eq!(summary.total_paolo_paid, 0.0);
        assert_eq!(summary.total_mary_paid, 10.0);
        assert_eq!(summary.mary_owes_paolo, 0.0);
        // The returned gift is absent from the recipient breakdown too.
        let leonardo = summary
            .recipient_stats
            .iter()
            .find(|s| s.recipient == Recipient::Leonardo)
            .expect("row exists");
        assert_eq!(leonardo.count, 1);
        assert_eq!(leonardo.value, 10.0);
    }

    #[test]
    fn test_excluded_gift_is_skipped_entirely() {
        let excluded = gift_model("g1", 99.0, Payer::Mary, Recipient::Paolo, |g| {
            g.is_excluded = true;
        });

        let summary = compute_summary(&[excluded]);
        assert_eq!(summary.total_spent, 0.0);
        assert_eq!(summary.total_mary_paid, 0.0);
        let paolo = summary
            .recipient_stats
            .iter()
            .find(|s| s.recipient == Recipient::Paolo)
            .expect("row exists");
        assert_eq!(paolo.count, 0);
    }

    #[test]
    fn test_paid_totals_conserve_total_spent() {
        // Mix of split/repaid/plain gifts on both sides: every spent euro is
        // attributed to exactly one payer.
        let gifts = vec![
            gift_model("g1", 100.0, Payer::Paolo, Recipient::Jacopo, |g| {
                g.is_split = true;
            }),
            gift_model("g2", 60.0, Payer::Mary, Recipient::Anna, |g| {
                g.is_split = true;
                g.is_repaid = true;
            }),
            gift_model("g3", 25.5, Payer::Mary, Recipient::Altri, |_| {}),
            gift_model("g4", 10.0, Payer::Paolo, Recipient::Mary, |g| {
                g.is_repaid = true;
            }),
        ];

        let summary = compute_summary(&gifts);
        assert_eq!(
            summary.total_paolo_paid + summary.total_mary_paid,
            summary.total_spent
        );
    }

    #[test]
    fn test_no_split_means_no_debt() {
        let gifts = vec![
            gift_model("g1", 100.0, Payer::Paolo, Recipient::Jacopo, |_| {}),
            gift_model("g2", 50.0, Payer::Mary, Recipient::Anna, |g| {
                g.is_repaid = true;
            }),
        ];

        let summary = compute_summary(&gifts);
        assert_eq!(summary.mary_owes_paolo, 0.0);
        assert_eq!(summary.paolo_owes_mary, 0.0);
        assert_eq!(summary.net_settlement, 0.0);
    }

    #[test]
    fn test_offsetting_splits_settle_to_zero() {
        // Symmetric unpaid splits cancel out.
        let gifts = vec![
            gift_model("g1", 80.0, Payer::Paolo, Recipient::Jacopo, |g| {
                g.is_split = true;
            }),
            gift_model("g2", 80.0, Payer::Mary, Recipient::Jacopo, |g| {
                g.is_split = true;
            }),
        ];

        let summary = compute_summary(&gifts);
        assert_eq!(summary.mary_owes_paolo, 40.0);
        assert_eq!(summary.paolo_owes_mary, 40.0);
        assert_eq!(summary.net_settlement, 0.0);
    }

    #[test]
    fn test_recipient_stats_use_sticker_price() {
        // Split halving never leaks into the per-recipient values.
        let gift = gift_model("g1", 100.0, Payer::Paolo, Recipient::Anna, |g| {
            g.is_split = true;
        });

        let summary = compute_summary(&[gift]);
        let anna = summary
            .recipient_stats
            .iter()
            .find(|s| s.recipient == Recipient::Anna)
            .expect("row exists");
        assert_eq!(anna.count, 1);
        assert_eq!(anna.value, 100.0);
    }

    #[test]
    fn test_recipient_stats_cover_all_recipients_in_order() {
        let gift = gift_model("g1", 10.0, Payer::Paolo, Recipient::Mary, |g| {
            g.occasion = Occasion::Compleanno;
        });

        let summary = compute_summary(&[gift]);
        let order: Vec<Recipient> = summary
            .recipient_stats
            .iter()
            .map(|s| s.recipient)
            .collect();
        assert_eq!(
            order,
            vec![
                Recipient::Jacopo,
                Recipient::Leonardo,
                Recipient::Mary,
                Recipient::Anna,
                Recipient::Paolo,
                Recipient::Altri,
            ]
        );
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(50.0), "€50.00");
        assert_eq!(format_amount(12.345), "€12.35");
    }

    #[test]
    fn test_format_settlement_verdict_directions() {
        let mut summary = compute_summary(&[]);
        assert_eq!(format_settlement_verdict(&summary), "All settled");

        summary.net_settlement = 25.0;
        assert_eq!(
            format_settlement_verdict(&summary),
            "Mary owes Paolo €25.00"
        );

        summary.net_settlement = -12.5;
        assert_eq!(
            format_settlement_verdict(&summary),
            "Paolo owes Mary €12.50"
        );
    }
}
