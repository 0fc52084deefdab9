// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reporting aggregations. All pure, total reductions over already-loaded
//! rows; empty input produces empty or zero results.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::{Account, Stock, Transaction, TxType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyFlow {
    pub month: String, // YYYY-MM
    pub income: Decimal,
    pub expense: Decimal,
}

impl MonthlyFlow {
    pub fn net_savings(&self) -> Decimal {
        self.income - self.expense
    }
}

/// Income and expense totals per calendar month, ascending by month key.
/// Transfers carry no single-leg semantics and are excluded.
pub fn monthly_cashflow(txs: &[Transaction]) -> Vec<MonthlyFlow> {
    let mut months: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for t in txs {
        let entry = months
            .entry(t.date.format("%Y-%m").to_string())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match t.r#type {
            TxType::Income => entry.0 += t.amount,
            TxType::Expense => entry.1 += t.amount,
            TxType::Transfer => {}
        }
    }
    months
        .into_iter()
        .map(|(month, (income, expense))| MonthlyFlow {
            month,
            income,
            expense,
        })
        .collect()
}

/// Expense totals grouped by category label, largest first. Categories absent
/// from the input do not appear.
pub fn expense_by_category(txs: &[Transaction]) -> Vec<(String, Decimal)> {
    let mut agg: HashMap<&str, Decimal> = HashMap::new();
    for t in txs.iter().filter(|t| t.r#type == TxType::Expense) {
        *agg.entry(t.category.as_str()).or_insert(Decimal::ZERO) += t.amount;
    }
    let mut items: Vec<(String, Decimal)> = agg
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    items
}

/// Sum of account balances plus the market value of every position.
pub fn net_worth(accounts: &[Account], stocks: &[Stock]) -> Decimal {
    let cash: Decimal = accounts.iter().map(|a| a.balance).sum();
    let holdings: Decimal = stocks.iter().map(|s| s.shares * s.current_price).sum();
    cash + holdings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountType;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tx(date: &str, kind: TxType, category: &str, amount: &str) -> Transaction {
        Transaction {
            id: 0,
            user_id: 1,
            account_id: 1,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            amount: dec(amount),
            r#type: kind,
            category: category.to_string(),
            note: None,
        }
    }

    #[test]
    fn cashflow_groups_by_month_ascending() {
        let txs = vec![
            tx("2024-02-01", TxType::Expense, "Shopping", "50"),
            tx("2024-01-15", TxType::Income, "Salary", "1000"),
            tx("2024-01-20", TxType::Expense, "Food & Dining", "200"),
        ];
        let flows = monthly_cashflow(&txs);
        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].month, "2024-01");
        assert_eq!(flows[0].income, dec("1000"));
        assert_eq!(flows[0].expense, dec("200"));
        assert_eq!(flows[0].net_savings(), dec("800"));
        assert_eq!(flows[1].month, "2024-02");
        assert_eq!(flows[1].income, Decimal::ZERO);
        assert_eq!(flows[1].expense, dec("50"));
    }

    #[test]
    fn cashflow_of_nothing_is_nothing() {
        assert!(monthly_cashflow(&[]).is_empty());
    }

    #[test]
    fn category_breakdown_sums_and_skips_absent_categories() {
        let txs = vec![
            tx("2024-01-01", TxType::Expense, "Food & Dining", "50"),
            tx("2024-01-02", TxType::Expense, "Food & Dining", "30"),
            tx("2024-01-03", TxType::Expense, "Transportation", "20"),
            tx("2024-01-04", TxType::Income, "Salary", "5000"),
        ];
        let breakdown = expense_by_category(&txs);
        assert_eq!(
            breakdown,
            vec![
                ("Food & Dining".to_string(), dec("80")),
                ("Transportation".to_string(), dec("20")),
            ]
        );
    }

    #[test]
    fn net_worth_adds_balances_and_market_values() {
        let account = |balance: &str| Account {
            id: 0,
            user_id: 1,
            name: "A".into(),
            r#type: AccountType::Bank,
            balance: dec(balance),
            opening_balance: dec(balance),
            currency: "USD".into(),
            bank_name: None,
        };
        let accounts = vec![account("1000"), account("500")];
        let stocks = vec![Stock {
            id: 0,
            user_id: 1,
            symbol: "XYZ".into(),
            name: "XYZ".into(),
            shares: dec("10"),
            avg_cost: dec("15"),
            current_price: dec("20"),
            last_updated: String::new(),
        }];
        assert_eq!(net_worth(&accounts, &stocks), dec("1700"));
        assert_eq!(net_worth(&[], &[]), Decimal::ZERO);
    }
}
