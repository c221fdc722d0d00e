// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::analytics::{
    DEFAULT_TOP_N, category_breakdown, category_breakdown_for, compare_periods, monthly_summary,
    monthly_trend, payment_source_breakdown, source_balances, top_n_with_overflow,
    yearly_summary,
};
use pocketbook::error::AnalyticsError;
use pocketbook::labels::{ExpenseCategory, IncomeSource};
use pocketbook::models::{BreakdownEntry, Metric, Transaction, TransactionKind};
use pocketbook::period::Period;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn income(id: &str, date: &str, amount: Decimal, source: &str) -> Transaction {
    Transaction::income(id, date, amount, Some(IncomeSource::from(source)))
}

fn expense(id: &str, date: &str, amount: Decimal, category: &str) -> Transaction {
    Transaction::expense(id, date, amount, Some(ExpenseCategory::from(category)), None)
}

fn paid(id: &str, date: &str, amount: Decimal, category: &str, from: &str) -> Transaction {
    Transaction::expense(
        id,
        date,
        amount,
        Some(ExpenseCategory::from(category)),
        Some(IncomeSource::from(from)),
    )
}

fn salary_and_grocery() -> Vec<Transaction> {
    vec![
        income("1", "2024-01-05", dec!(1000), "Salary"),
        expense("2", "2024-01-20", dec!(300), "Grocery"),
    ]
}

fn ids(txs: &[&Transaction]) -> Vec<String> {
    txs.iter().map(|t| t.id.clone()).collect()
}

#[test]
fn monthly_summary_totals_january() {
    let txs = salary_and_grocery();
    let s = monthly_summary(&txs, day("2024-01-15"));
    assert_eq!(s.income, dec!(1000));
    assert_eq!(s.expenses, dec!(300));
    assert_eq!(s.balance, dec!(700));
    assert_eq!(ids(&s.transactions), vec!["1", "2"]);
}

#[test]
fn monthly_summary_empty_month_is_zero() {
    let txs = salary_and_grocery();
    let s = monthly_summary(&txs, day("2024-02-15"));
    assert_eq!(s.income, Decimal::ZERO);
    assert_eq!(s.expenses, Decimal::ZERO);
    assert_eq!(s.balance, Decimal::ZERO);
    assert!(s.transactions.is_empty());
}

#[test]
fn monthly_summary_includes_both_month_edges() {
    let txs = vec![
        income("before", "2024-01-31", dec!(1), "Salary"),
        income("first", "2024-02-01", dec!(10), "Salary"),
        expense("last", "2024-02-29", dec!(4), "Transport"),
        expense("after", "2024-03-01", dec!(100), "Transport"),
    ];
    let s = monthly_summary(&txs, day("2024-02-10"));
    assert_eq!(ids(&s.transactions), vec!["first", "last"]);
    assert_eq!(s.balance, dec!(6));
}

#[test]
fn monthly_summary_december_rolls_into_next_year() {
    let txs = vec![
        expense("a", "2023-12-31", dec!(5), "Medical"),
        expense("b", "2024-01-01", dec!(7), "Medical"),
    ];
    let s = monthly_summary(&txs, day("2023-12-01"));
    assert_eq!(ids(&s.transactions), vec!["a"]);
}

#[test]
fn yearly_summary_excludes_other_years() {
    let txs = vec![
        income("dec", "2023-12-28", dec!(500), "Salary"),
        expense("dec2", "2023-12-31", dec!(120.50), "Grocery"),
        income("jan", "2024-01-02", dec!(800), "Salary"),
    ];
    let s = yearly_summary(&txs, 2023).unwrap();
    assert_eq!(ids(&s.transactions), vec!["dec", "dec2"]);
    assert_eq!(s.income, dec!(500));
    assert_eq!(s.balance, dec!(379.50));
}

#[test]
fn yearly_summary_handles_leap_day() {
    let txs = vec![income("leap", "2024-02-29", dec!(42), "Family")];
    assert_eq!(yearly_summary(&txs, 2024).unwrap().income, dec!(42));
    assert!(yearly_summary(&txs, 2023).unwrap().is_empty());
}

#[test]
fn yearly_summary_rejects_out_of_range_year() {
    let txs = salary_and_grocery();
    assert_eq!(
        yearly_summary(&txs, 0).unwrap_err(),
        AnalyticsError::InvalidYear("0".into())
    );
    assert!(yearly_summary(&txs, 10_000).is_err());
}

#[test]
fn malformed_dates_are_skipped_not_fatal() {
    let txs = vec![
        income("ok", "2024-01-05", dec!(100), "Salary"),
        income("bad", "2024-13-40", dec!(999), "Salary"),
        expense("worse", "last tuesday", dec!(999), "Grocery"),
        expense("ok2", "2024-01-06", dec!(40), "Grocery"),
    ];
    let s = monthly_summary(&txs, day("2024-01-01"));
    assert_eq!(ids(&s.transactions), vec!["ok", "ok2"]);
    assert_eq!(s.balance, dec!(60));

    let y = yearly_summary(&txs, 2024).unwrap();
    assert_eq!(y.transactions.len(), 2);
    let b = category_breakdown(&txs, TransactionKind::Expense, day("2024-01-01"));
    assert_eq!(b, vec![BreakdownEntry::new("Grocery", dec!(40))]);
}

#[test]
fn summaries_do_not_depend_on_input_order() {
    let mut txs = vec![
        income("1", "2024-05-01", dec!(10.10), "Salary"),
        expense("2", "2024-05-03", dec!(3.30), "Grocery"),
        income("3", "2024-05-09", dec!(0.20), "Freelance"),
        expense("4", "2024-05-31", dec!(1.05), "Transport"),
        expense("5", "2024-05-15", dec!(2.00), "Grocery"),
    ];
    let reference = day("2024-05-20");
    let forward = monthly_summary(&txs, reference);
    let (i, e, b) = (forward.income, forward.expenses, forward.balance);
    let breakdown = category_breakdown(&txs, TransactionKind::Expense, reference);

    txs.reverse();
    let backward = monthly_summary(&txs, reference);
    assert_eq!((backward.income, backward.expenses, backward.balance), (i, e, b));
    assert_eq!(backward.balance, backward.income - backward.expenses);

    let mut a: Vec<Decimal> = breakdown.iter().map(|x| x.value).collect();
    let mut c: Vec<Decimal> = category_breakdown(&txs, TransactionKind::Expense, reference)
        .iter()
        .map(|x| x.value)
        .collect();
    a.sort();
    c.sort();
    assert_eq!(a, c);
}

#[test]
fn repeated_queries_are_identical() {
    let txs = salary_and_grocery();
    let r = day("2024-01-15");
    assert_eq!(monthly_summary(&txs, r), monthly_summary(&txs, r));
    assert_eq!(
        category_breakdown(&txs, TransactionKind::Income, r),
        category_breakdown(&txs, TransactionKind::Income, r)
    );
}

#[test]
fn category_breakdown_sums_and_sorts_descending() {
    let txs = vec![
        expense("1", "2024-03-02", dec!(30), "Transport"),
        expense("2", "2024-03-04", dec!(100), "Grocery"),
        expense("3", "2024-03-09", dec!(50), "Grocery"),
        income("4", "2024-03-01", dec!(2000), "Salary"),
    ];
    let b = category_breakdown(&txs, TransactionKind::Expense, day("2024-03-15"));
    assert_eq!(
        b,
        vec![
            BreakdownEntry::new("Grocery", dec!(150)),
            BreakdownEntry::new("Transport", dec!(30)),
        ]
    );
}

#[test]
fn category_breakdown_ties_keep_first_seen_order() {
    let txs = vec![
        expense("1", "2024-03-02", dec!(10), "Medical"),
        expense("2", "2024-03-03", dec!(10), "Entertainment"),
        expense("3", "2024-03-04", dec!(25), "Savings"),
        expense("4", "2024-03-05", dec!(10), "Grocery"),
    ];
    let names: Vec<String> = category_breakdown(&txs, TransactionKind::Expense, day("2024-03-01"))
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["Savings", "Medical", "Entertainment", "Grocery"]);
}

#[test]
fn income_breakdown_groups_by_source_with_other_fallback() {
    let mut blank = income("3", "2024-04-10", dec!(5), "Salary");
    blank.source = Some(IncomeSource::from("   "));
    let txs = vec![
        income("1", "2024-04-01", dec!(900), "Salary"),
        Transaction::income("2", "2024-04-02", dec!(40), None),
        blank,
        income("4", "2024-04-03", dec!(60), "Side Gig"),
    ];
    let b = category_breakdown(&txs, TransactionKind::Income, day("2024-04-30"));
    assert_eq!(
        b,
        vec![
            BreakdownEntry::new("Salary", dec!(900)),
            BreakdownEntry::new("Side Gig", dec!(60)),
            BreakdownEntry::new("Other", dec!(45)),
        ]
    );
}

#[test]
fn yearly_category_breakdown_spans_all_months() {
    let txs = vec![
        expense("1", "2024-01-10", dec!(20), "Grocery"),
        expense("2", "2024-11-10", dec!(30), "Grocery"),
        expense("3", "2025-01-10", dec!(99), "Grocery"),
    ];
    let b = category_breakdown_for(&txs, TransactionKind::Expense, Period::year(2024).unwrap());
    assert_eq!(b, vec![BreakdownEntry::new("Grocery", dec!(50))]);
}

#[test]
fn payment_source_breakdown_uses_unknown_fallback() {
    let txs = vec![
        paid("1", "2024-06-01", dec!(70), "Grocery", "Salary"),
        expense("2", "2024-06-02", dec!(20), "Transport"),
        paid("3", "2024-06-03", dec!(15), "Medical", "Credit Card"),
        paid("4", "2024-06-04", dec!(30), "Grocery", "Salary"),
        income("5", "2024-06-05", dec!(500), "Salary"),
    ];
    let month = payment_source_breakdown(&txs, Period::Month(day("2024-06-15")));
    assert_eq!(
        month,
        vec![
            BreakdownEntry::new("Salary", dec!(100)),
            BreakdownEntry::new("Unknown", dec!(20)),
            BreakdownEntry::new("Credit Card", dec!(15)),
        ]
    );
    let year = payment_source_breakdown(&txs, Period::year(2024).unwrap());
    assert_eq!(year, month);
    assert!(payment_source_breakdown(&txs, Period::year(2023).unwrap()).is_empty());
}

fn seven_categories() -> Vec<BreakdownEntry> {
    vec![
        BreakdownEntry::new("House Rent", dec!(100)),
        BreakdownEntry::new("Grocery", dec!(10)),
        BreakdownEntry::new("Transport", dec!(10)),
        BreakdownEntry::new("Medical", dec!(10)),
        BreakdownEntry::new("Internet Bill", dec!(10)),
        BreakdownEntry::new("Savings", dec!(10)),
        BreakdownEntry::new("Entertainment", dec!(10)),
    ]
}

#[test]
fn top_n_folds_tail_into_other() {
    let folded = top_n_with_overflow(seven_categories(), DEFAULT_TOP_N);
    assert_eq!(folded.len(), 6);
    assert_eq!(folded[0], BreakdownEntry::new("House Rent", dec!(100)));
    assert_eq!(folded[5], BreakdownEntry::new("Other", dec!(20)));
    let total: Decimal = folded.iter().map(|e| e.value).sum();
    assert_eq!(total, dec!(160));
}

#[test]
fn top_n_leaves_short_lists_alone() {
    let entries = seven_categories();
    assert_eq!(top_n_with_overflow(entries.clone(), 7), entries);
    assert_eq!(top_n_with_overflow(entries.clone(), 10), entries);
    assert!(top_n_with_overflow(Vec::new(), 5).is_empty());
}

#[test]
fn top_n_omits_zero_overflow() {
    let entries = vec![
        BreakdownEntry::new("Grocery", dec!(10)),
        BreakdownEntry::new("Transport", dec!(5)),
        BreakdownEntry::new("Medical", dec!(0)),
    ];
    let folded = top_n_with_overflow(entries, 2);
    assert_eq!(
        folded,
        vec![
            BreakdownEntry::new("Grocery", dec!(10)),
            BreakdownEntry::new("Transport", dec!(5)),
        ]
    );
}

#[test]
fn top_n_merges_into_existing_other() {
    let entries = vec![
        BreakdownEntry::new("Grocery", dec!(50)),
        BreakdownEntry::new("Other", dec!(40)),
        BreakdownEntry::new("Medical", dec!(7)),
        BreakdownEntry::new("Transport", dec!(3)),
    ];
    let folded = top_n_with_overflow(entries, 2);
    assert_eq!(
        folded,
        vec![
            BreakdownEntry::new("Grocery", dec!(50)),
            BreakdownEntry::new("Other", dec!(50)),
        ]
    );
}

#[test]
fn top_n_resorts_when_other_grows_past_a_neighbour() {
    let entries = vec![
        BreakdownEntry::new("Grocery", dec!(100)),
        BreakdownEntry::new("Transport", dec!(50)),
        BreakdownEntry::new("Other", dec!(40)),
        BreakdownEntry::new("Medical", dec!(30)),
        BreakdownEntry::new("Savings", dec!(30)),
    ];
    let folded = top_n_with_overflow(entries, 3);
    assert_eq!(
        folded,
        vec![
            BreakdownEntry::new("Grocery", dec!(100)),
            BreakdownEntry::new("Other", dec!(100)),
            BreakdownEntry::new("Transport", dec!(50)),
        ]
    );
}

#[test]
fn top_zero_collapses_everything() {
    let folded = top_n_with_overflow(seven_categories(), 0);
    assert_eq!(folded, vec![BreakdownEntry::new("Other", dec!(160))]);
}

#[test]
fn compare_periods_builds_metric_rows() {
    let txs = vec![
        income("1", "2024-01-05", dec!(1000), "Salary"),
        expense("2", "2024-01-20", dec!(300), "Grocery"),
        income("3", "2024-02-05", dec!(1100), "Salary"),
        expense("4", "2024-02-07", dec!(1200), "House Rent"),
    ];
    let jan = monthly_summary(&txs, day("2024-01-01"));
    let feb = monthly_summary(&txs, day("2024-02-01"));
    let rows = compare_periods(&jan, "Jan 2024", &feb, "Feb 2024");

    let metrics: Vec<Metric> = rows.iter().map(|r| r.metric).collect();
    assert_eq!(metrics, vec![Metric::Income, Metric::Expenses, Metric::Balance]);
    assert_eq!(rows[0].get("Jan 2024"), Some(dec!(1000)));
    assert_eq!(rows[0].get("Feb 2024"), Some(dec!(1100)));
    assert_eq!(rows[2].get("Feb 2024"), Some(dec!(-100)));

    let json = serde_json::to_value(&rows[1]).unwrap();
    assert_eq!(json["name"], "Expenses");
    assert_eq!(json["Jan 2024"], "300");
    assert_eq!(json["Feb 2024"], "1200");
}

#[test]
fn compare_periods_keeps_both_values_on_label_clash() {
    let txs = salary_and_grocery();
    let jan = monthly_summary(&txs, day("2024-01-01"));
    let empty = monthly_summary(&txs, day("2024-02-01"));
    let rows = compare_periods(&jan, "2024", &empty, "2024");
    assert_eq!(rows[0].get("2024"), Some(dec!(1000)));
    assert_eq!(rows[0].get("2024 (2)"), Some(Decimal::ZERO));
    assert_eq!(rows[0].values.len(), 2);
}

#[test]
fn monthly_trend_has_twelve_months() {
    let txs = vec![
        income("1", "2024-01-05", dec!(1000), "Salary"),
        expense("2", "2024-01-20", dec!(300), "Grocery"),
        expense("3", "2024-12-31", dec!(50), "Transport"),
        income("4", "2023-12-31", dec!(9), "Salary"),
    ];
    let trend = monthly_trend(&txs, 2024).unwrap();
    assert_eq!(trend.len(), 12);
    assert_eq!(trend[0].month, "Jan");
    assert_eq!(trend[0].balance, dec!(700));
    assert_eq!(trend[5].income, Decimal::ZERO);
    assert_eq!(trend[11].month, "Dec");
    assert_eq!(trend[11].expenses, dec!(50));
    assert!(monthly_trend(&txs, -5).is_err());
}

#[test]
fn source_balances_track_remaining_per_source() {
    let txs = vec![
        income("1", "2024-07-01", dec!(1000), "Salary"),
        income("2", "2024-07-02", dec!(300), "Freelance"),
        paid("3", "2024-07-03", dec!(400), "House Rent", "Salary"),
        paid("4", "2024-07-04", dec!(350), "Grocery", "Freelance"),
        paid("5", "2024-07-05", dec!(80), "Medical", "Credit Card"),
        expense("6", "2024-07-06", dec!(999), "Transport"),
        income("7", "2024-06-30", dec!(5000), "Salary"),
    ];
    let rows = source_balances(&txs, Some(Period::Month(day("2024-07-10"))));
    let flat: Vec<(&str, Decimal, Decimal, Decimal)> = rows
        .iter()
        .map(|r| (r.source.as_str(), r.income, r.spent, r.remaining))
        .collect();
    assert_eq!(
        flat,
        vec![
            ("Salary", dec!(1000), dec!(400), dec!(600)),
            ("Freelance", dec!(300), dec!(350), dec!(-50)),
            ("Credit Card", dec!(0), dec!(80), dec!(-80)),
        ]
    );

    let all = source_balances(&txs, None);
    assert_eq!(all[0].income, dec!(6000));
}

#[test]
fn source_balances_leave_out_income_without_a_source() {
    let txs = vec![
        income("1", "2024-07-01", dec!(1000), "Salary"),
        Transaction::income("2", "2024-07-02", dec!(250), None),
        income("3", "2024-07-03", dec!(75), "  "),
    ];
    let rows = source_balances(&txs, None);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].source, "Salary");
    assert_eq!(rows[0].income, dec!(1000));
}

#[test]
fn recent_lists_newest_first() {
    let txs = vec![
        income("a", "2024-01-03", dec!(1), "Salary"),
        income("b", "2024-01-30", dec!(1), "Salary"),
        income("c", "2024-01-12", dec!(1), "Salary"),
    ];
    let s = monthly_summary(&txs, day("2024-01-01"));
    assert_eq!(ids(&s.recent(2)), vec!["b", "c"]);
}
