//! Summary figures derived from the list of transactions.
//!
//! Amounts that cannot be read as a finite number count as zero, so the
//! summary can always be shown even when the store returns bad data.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::transaction::Transaction;

/// The upper bound of [Metrics::ratio].
pub const MAX_RATIO: f64 = 100.0;

/// Summary figures for a list of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    /// The sum of all amounts.
    pub balance: f64,
    /// The sum of the positive amounts.
    pub income: f64,
    /// The absolute value of the sum of the negative amounts.
    pub expense: f64,
    /// Expenses as a percentage of income, capped at [MAX_RATIO].
    ///
    /// Zero when there is no income.
    pub ratio: f64,
    /// How many amounts could not be read as a number and were counted as zero.
    pub coerced_amounts: usize,
}

/// Compute the summary figures for `transactions`.
///
/// Never fails: an amount that is not a finite number contributes zero to
/// every figure and is only reflected in [Metrics::coerced_amounts].
///
/// Income and expense are summed exactly, so the result does not depend on
/// the order of `transactions`, and `balance` is always `income - expense`.
/// Every figure is finite.
pub fn compute_metrics(transactions: &[Transaction]) -> Metrics {
    let mut coerced_amounts = 0;
    let amounts: Vec<f64> = transactions
        .iter()
        .map(|transaction| {
            transaction.amount.to_finite().unwrap_or_else(|| {
                coerced_amounts += 1;
                0.0
            })
        })
        .collect();

    let (income, expense) =
        exact_totals(&amounts).unwrap_or_else(|| approximate_totals(&amounts));

    Metrics {
        balance: income - expense,
        income,
        expense,
        ratio: expense_ratio(income, expense),
        coerced_amounts,
    }
}

/// Income and expense summed as decimals.
///
/// Returns `None` if an amount or a total does not fit in a [Decimal].
fn exact_totals(amounts: &[f64]) -> Option<(f64, f64)> {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;

    for &amount in amounts {
        // The shortest representation that reads back as `amount`, e.g. "0.1".
        let amount = Decimal::from_str(&amount.to_string()).ok()?;

        if amount.is_sign_positive() {
            income = income.checked_add(amount)?;
        } else {
            expense = expense.checked_add(amount.abs())?;
        }
    }

    Some((decimal_to_f64(income), decimal_to_f64(expense)))
}

fn decimal_to_f64(value: Decimal) -> f64 {
    // Parsing is correctly rounded.
    value.to_string().parse().unwrap_or(0.0)
}

/// Income and expense for amounts too large for [Decimal].
///
/// Amounts are added smallest first so that the totals do not depend on the
/// order of `amounts`, and the totals saturate at [f64::MAX].
fn approximate_totals(amounts: &[f64]) -> (f64, f64) {
    let mut income: Vec<f64> = amounts
        .iter()
        .copied()
        .filter(|&amount| amount > 0.0)
        .collect();
    let mut expense: Vec<f64> = amounts
        .iter()
        .filter(|&&amount| amount < 0.0)
        .map(|amount| amount.abs())
        .collect();

    income.sort_by(f64::total_cmp);
    expense.sort_by(f64::total_cmp);

    let saturating_sum = |values: Vec<f64>| values.into_iter().sum::<f64>().min(f64::MAX);

    (saturating_sum(income), saturating_sum(expense))
}

fn expense_ratio(income: f64, expense: f64) -> f64 {
    if income <= 0.0 {
        return 0.0;
    }

    let ratio = expense / income * 100.0;

    // Very small incomes can overflow the division.
    if ratio.is_finite() {
        ratio.min(MAX_RATIO)
    } else {
        MAX_RATIO
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::transaction::{Amount, Transaction, TransactionId};

    use super::{MAX_RATIO, Metrics, compute_metrics};

    fn transactions(amounts: &[Amount]) -> Vec<Transaction> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| Transaction {
                id: TransactionId::new(i.to_string()),
                description: format!("transaction #{i}"),
                amount: amount.clone(),
                created_at: "2025-01-01T00:00:00Z".to_owned(),
            })
            .collect()
    }

    fn numbers(amounts: &[f64]) -> Vec<Transaction> {
        let amounts: Vec<Amount> = amounts.iter().copied().map(Amount::from).collect();
        transactions(&amounts)
    }

    #[test]
    fn empty_list_is_all_zero() {
        assert_eq!(compute_metrics(&[]), Metrics::default());
    }

    #[test]
    fn income_and_expense() {
        let got = compute_metrics(&numbers(&[100.0, -40.0]));

        assert_eq!(
            got,
            Metrics {
                balance: 60.0,
                income: 100.0,
                expense: 40.0,
                ratio: 40.0,
                coerced_amounts: 0,
            }
        );
    }

    #[test]
    fn ratio_is_zero_without_income() {
        let got = compute_metrics(&numbers(&[-10.0, -20.0]));

        assert_eq!(got.balance, -30.0);
        assert_eq!(got.income, 0.0);
        assert_eq!(got.expense, 30.0);
        assert_eq!(got.ratio, 0.0);
    }

    #[test]
    fn malformed_amount_counts_as_zero() {
        let got = compute_metrics(&transactions(&[Amount::Text("abc".to_owned())]));

        assert_eq!(
            got,
            Metrics {
                coerced_amounts: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn malformed_amounts_do_not_change_other_figures() {
        let got = compute_metrics(&transactions(&[
            Amount::Number(50.0),
            Amount::Other(json!(null)),
            Amount::Text("twelve".to_owned()),
            Amount::Number(f64::NAN),
            Amount::Number(-20.0),
        ]));

        assert_eq!(got.balance, 30.0);
        assert_eq!(got.income, 50.0);
        assert_eq!(got.expense, 20.0);
        assert_eq!(got.ratio, 40.0);
        assert_eq!(got.coerced_amounts, 3);
    }

    #[test]
    fn ratio_is_capped() {
        let got = compute_metrics(&numbers(&[10.0, -1000.0]));

        assert_eq!(got.expense, 1000.0);
        assert_eq!(got.ratio, MAX_RATIO);
    }

    #[test]
    fn ratio_is_capped_when_division_overflows() {
        let got = compute_metrics(&numbers(&[f64::MIN_POSITIVE, -f64::MAX]));

        assert_eq!(got.ratio, MAX_RATIO);
    }

    #[test]
    fn zero_amounts_are_neither_income_nor_expense() {
        let got = compute_metrics(&numbers(&[0.0, 0.0]));

        assert_eq!(got, Metrics::default());
    }

    #[test]
    fn numeric_strings_are_counted() {
        let got = compute_metrics(&transactions(&[
            Amount::Text("200".to_owned()),
            Amount::Text("-50.5".to_owned()),
        ]));

        assert_eq!(got.balance, 149.5);
        assert_eq!(got.income, 200.0);
        assert_eq!(got.expense, 50.5);
        assert_eq!(got.coerced_amounts, 0);
    }

    #[test]
    fn balance_is_income_minus_expense() {
        let cases: [&[f64]; 5] = [
            &[],
            &[1.0, 2.0, 3.0],
            &[-1.0, -2.0, 5.0],
            &[1234.0, -99.0, 0.0, -1.0, 17.0],
            &[-500.0],
        ];

        for amounts in cases {
            let got = compute_metrics(&numbers(amounts));

            assert_eq!(
                got.balance,
                got.income - got.expense,
                "identity does not hold for {amounts:?}: {got:?}"
            );
        }
    }

    #[test]
    fn ratio_stays_within_bounds() {
        let cases: [&[f64]; 6] = [
            &[],
            &[1.0],
            &[-1.0],
            &[1.0, -1.0],
            &[0.01, -1_000_000.0],
            &[1_000_000.0, -0.01],
        ];

        for amounts in cases {
            let got = compute_metrics(&numbers(amounts));

            assert!(
                (0.0..=MAX_RATIO).contains(&got.ratio),
                "ratio out of bounds for {amounts:?}: {got:?}"
            );
        }
    }

    #[test]
    fn order_does_not_matter() {
        let amounts = [120.0, -30.0, 7.0, -45.0, 0.0, 300.0];
        let want = compute_metrics(&numbers(&amounts));

        let mut reversed = amounts;
        reversed.reverse();
        assert_eq!(compute_metrics(&numbers(&reversed)), want);

        let mut rotated = amounts;
        rotated.rotate_left(2);
        assert_eq!(compute_metrics(&numbers(&rotated)), want);
    }

    #[test]
    fn cent_amounts_are_summed_exactly() {
        let got = compute_metrics(&numbers(&[0.1, 0.2, 0.3]));

        assert_eq!(got.balance, 0.6);
        assert_eq!(got.income, 0.6);
        assert_eq!(compute_metrics(&numbers(&[0.3, 0.2, 0.1])), got);
    }

    #[test]
    fn cent_amounts_keep_balance_identity() {
        let cases: [&[f64]; 4] = [
            &[0.1, -0.3, 0.2],
            &[0.7, -0.3],
            &[19.99, -4.75, -0.01, 1234.56],
            &[-0.1, -0.2, 0.3],
        ];

        for amounts in cases {
            let got = compute_metrics(&numbers(amounts));

            assert_eq!(
                got.balance,
                got.income - got.expense,
                "identity does not hold for {amounts:?}: {got:?}"
            );

            let mut reversed = amounts.to_vec();
            reversed.reverse();
            assert_eq!(compute_metrics(&numbers(&reversed)), got);
        }

        assert_eq!(compute_metrics(&numbers(&[0.1, -0.3, 0.2])).balance, 0.0);
    }

    #[test]
    fn huge_amounts_stay_finite() {
        let amounts = [f64::MAX, f64::MAX, -f64::MAX, -f64::MAX];
        let got = compute_metrics(&numbers(&amounts));

        for figure in [got.balance, got.income, got.expense, got.ratio] {
            assert!(figure.is_finite(), "got non-finite figure in {got:?}");
        }
        assert_eq!(got.income, f64::MAX);
        assert_eq!(got.expense, f64::MAX);
        assert_eq!(got.balance, 0.0);
        assert_eq!(got.ratio, MAX_RATIO);

        let mut shuffled = amounts;
        shuffled.swap(1, 2);
        assert_eq!(compute_metrics(&numbers(&shuffled)), got);
    }
}
