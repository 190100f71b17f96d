// ═══════════════════════════════════════════════════════════════════
// Integration Tests — HabitLedger end to end over real stores
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use habit_ledger_core::config::{PolicyConfig, DEFAULT_STORAGE_KEY};
use habit_ledger_core::models::expense::Category;
use habit_ledger_core::models::goal::GoalStep;
use habit_ledger_core::models::month::MonthKey;
use habit_ledger_core::models::state::{AppState, AppStatePatch, MoneyField};
use habit_ledger_core::models::summary::ScoreBand;
use habit_ledger_core::models::transfer::Contributor;
use habit_ledger_core::storage::file_store::FileStore;
use habit_ledger_core::storage::format;
use habit_ledger_core::storage::memory::MemoryStore;
use habit_ledger_core::storage::traits::KeyValueStore;
use habit_ledger_core::HabitLedger;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

const TODAY: (i32, u32, u32) = (2024, 4, 15);

fn ledger() -> HabitLedger<MemoryStore> {
    ledger_on(MemoryStore::new())
}

fn ledger_on<S: KeyValueStore>(store: S) -> HabitLedger<S> {
    HabitLedger::open_with_clock(store, PolicyConfig::default(), || {
        d(TODAY.0, TODAY.1, TODAY.2)
    })
}

/// Reopen a ledger from whatever its store currently holds.
fn reopen(ledger: &HabitLedger<MemoryStore>) -> HabitLedger<MemoryStore> {
    ledger_on(ledger.store().clone())
}

fn stored(ledger: &HabitLedger<MemoryStore>) -> Option<String> {
    ledger.store().get(DEFAULT_STORAGE_KEY).unwrap()
}

fn stored_text(ledger: &HabitLedger<MemoryStore>) -> String {
    stored(ledger).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Open / update / persistence
// ═══════════════════════════════════════════════════════════════════

mod lifecycle {
    use super::*;

    #[test]
    fn empty_store_opens_with_default_record() {
        let l = ledger();
        assert_eq!(l.state(), &AppState::default());
        assert_eq!(l.today(), d(2024, 4, 15));
        assert_eq!(l.current_month(), MonthKey::new(2024, 4).unwrap());
        // nothing is written until the first update
        assert!(l.store().is_empty());
    }

    #[test]
    fn update_persists_full_record() {
        let mut l = ledger();
        l.update(AppStatePatch {
            mood: Some(5),
            income: Some(8000.0),
            ..AppStatePatch::default()
        });
        let text = stored(&l).unwrap();
        let decoded = format::decode(&text).unwrap();
        assert_eq!(&decoded, l.state());
        assert_eq!(decoded.mood, 5);
    }

    #[test]
    fn reopen_restores_state() {
        let mut l = ledger();
        l.set_mood(4);
        l.add_expense("42.5", Category::Food, "lunch").unwrap();
        let again = reopen(&l);
        assert_eq!(again.state(), l.state());
    }

    #[test]
    fn corrupt_store_opens_with_default() {
        let mut store = MemoryStore::new();
        store.set(DEFAULT_STORAGE_KEY, "not json at all").unwrap();
        let l = ledger_on(store);
        assert_eq!(l.state(), &AppState::default());
    }

    #[test]
    fn legacy_bare_record_is_read() {
        let mut store = MemoryStore::new();
        store
            .set(DEFAULT_STORAGE_KEY, r#"{ "bank": 18500, "btc": 0.15, "btcPrice": 67000 }"#)
            .unwrap();
        let l = ledger_on(store);
        assert_close(l.net_worth(), 28_550.0);
    }

    #[test]
    fn quota_failure_keeps_in_memory_state() {
        let mut l = ledger_on(MemoryStore::with_quota(16));
        l.set_money(MoneyField::Income, 5000.0);
        assert_eq!(l.state().income, 5000.0);
        assert!(l.store().is_empty());
    }

    #[test]
    fn custom_storage_key() {
        let config = PolicyConfig {
            storage_key: "alt_key".into(),
            ..PolicyConfig::default()
        };
        let mut l = HabitLedger::open_with_config(MemoryStore::new(), config);
        l.set_cycling(true);
        assert!(l.store().get("alt_key").unwrap().is_some());
        assert!(l.store().get(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn invalid_config_falls_back_to_default() {
        let config = PolicyConfig {
            history_window: 0,
            ..PolicyConfig::default()
        };
        let l = HabitLedger::open_with_clock(MemoryStore::new(), config, || d(2024, 4, 15));
        assert_eq!(l.config(), &PolicyConfig::default());

        let config = PolicyConfig {
            storage_key: "../outside".into(),
            ..PolicyConfig::default()
        };
        let mut l = HabitLedger::open_with_clock(MemoryStore::new(), config, || d(2024, 4, 15));
        l.set_mood(4);
        assert!(stored(&l).is_some());
    }

    #[test]
    fn record_with_broken_entries_keeps_the_rest() {
        let mut store = MemoryStore::new();
        store
            .set(
                DEFAULT_STORAGE_KEY,
                r#"{
                    "version": 1,
                    "state": {
                        "income": 8000,
                        "bankBalance": 18500,
                        "expenses": null,
                        "goals": [
                            { "id": 7, "name": "Car", "target": "1000", "current": 250 },
                            "garbage"
                        ]
                    }
                }"#,
            )
            .unwrap();
        let mut l = ledger_on(store);
        assert_eq!(l.state().income, 8000.0);
        assert_eq!(l.state().bank_balance, 18_500.0);
        assert!(l.state().expenses.is_empty());
        assert_eq!(l.state().goals.len(), 1);

        // the next write keeps the surviving data
        l.set_mood(4);
        let persisted = format::decode(&stored_text(&l)).unwrap();
        assert_eq!(persisted.income, 8000.0);
        assert_eq!(persisted.goals[0].name, "Car");
    }

    #[test]
    fn reset_restores_default() {
        let mut l = ledger();
        l.set_money(MoneyField::BankBalance, 900.0);
        l.add_goal("Car", "1000", "", "").unwrap();
        l.reset();
        assert_eq!(l.state(), &AppState::default());
        assert_eq!(reopen(&l).state(), &AppState::default());
    }

    #[test]
    fn export_then_import() {
        let mut source = ledger();
        source.set_money(MoneyField::Savings, 2500.0);
        source.add_transfer(Contributor::Partner, "300", "").unwrap();
        let json = source.export_json().unwrap();

        let mut target = ledger();
        target.import_json(&json).unwrap();
        assert_eq!(target.state(), source.state());
        assert!(stored(&target).is_some());
    }

    #[test]
    fn bad_import_leaves_state_untouched() {
        let mut l = ledger();
        l.set_mood(5);
        let before = l.state().clone();
        assert!(l.import_json("[]").is_err());
        assert!(l.import_json(r#"{ "version": 42, "state": {} }"#).is_err());
        assert_eq!(l.state(), &before);
    }

    #[test]
    fn file_store_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut l = ledger_on(FileStore::new(dir.path()));
            l.set_money(MoneyField::BankBalance, 1234.0);
            l.add_ride(None, "42", "27.5", "", false).unwrap();
        }
        let l = ledger_on(FileStore::new(dir.path()));
        assert_eq!(l.state().bank_balance, 1234.0);
        assert_eq!(l.state().rides.len(), 1);
        assert_eq!(l.state().rides[0].date, d(2024, 4, 15));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Habits and score
// ═══════════════════════════════════════════════════════════════════

mod habits {
    use super::*;

    #[test]
    fn setters_clamp_inputs() {
        let mut l = ledger();
        l.set_work_focus(9);
        l.set_study(5);
        l.set_mood(0);
        l.set_sleep(11.3);
        assert_eq!(l.state().work_focus, 2);
        assert_eq!(l.state().study, 2);
        assert_eq!(l.state().mood, 1);
        assert_eq!(l.state().sleep, 9.0);
    }

    #[test]
    fn sleep_snaps_to_half_hours() {
        let mut l = ledger();
        l.set_sleep(6.7);
        assert_eq!(l.state().sleep, 6.5);
        l.set_sleep(6.8);
        assert_eq!(l.state().sleep, 7.0);
    }

    #[test]
    fn perfect_day() {
        let mut l = ledger();
        l.set_work_focus(2);
        l.set_study(2);
        l.set_cycling(true);
        l.set_sleep(9.0);
        l.set_mood(5);
        assert_eq!(l.daily_score(), 10.0);
        assert_eq!(l.score_band(), ScoreBand::High);
    }

    #[test]
    fn streak_is_stored_verbatim() {
        let mut l = ledger();
        l.set_streak(12);
        assert_eq!(reopen(&l).state().streak, 12);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Money
// ═══════════════════════════════════════════════════════════════════

mod money {
    use super::*;

    #[test]
    fn invalid_expense_is_a_no_op() {
        let mut l = ledger();
        for raw in ["", "abc", "0", "-3"] {
            assert!(l.add_expense(raw, Category::Food, "").is_none());
        }
        assert!(l.state().expenses.is_empty());
        assert!(l.store().is_empty());
    }

    #[test]
    fn expense_dated_today_lands_in_current_month() {
        let mut l = ledger();
        let id = l.add_expense(" 12.50 ", Category::Groceries, "  ").unwrap();
        let expense = &l.state().expenses[0];
        assert_eq!(expense.id, id);
        assert_eq!(expense.amount, 12.5);
        assert_eq!(expense.date, d(2024, 4, 15));
        assert!(expense.note.is_none());
        assert_eq!(l.expenses_this_month().len(), 1);
    }

    #[test]
    fn past_month_expense_is_not_this_month() {
        let mut l = ledger();
        l.add_expense_on("50", Category::Food, "", d(2024, 3, 31)).unwrap();
        l.add_expense("20", Category::Food, "").unwrap();
        assert_eq!(l.expenses_this_month().len(), 1);
        assert_close(l.money_summary().monthly_expenses, 20.0);
        let march = MonthKey::new(2024, 3).unwrap();
        assert_close(l.money_summary_for(march).monthly_expenses, 50.0);
    }

    #[test]
    fn savings_rate_for_current_month() {
        let mut l = ledger();
        l.set_money(MoneyField::Income, 5000.0);
        l.add_expense("2000", Category::Housing, "").unwrap();
        assert_close(l.savings_rate(), 60.0);
    }

    #[test]
    fn money_input_parsing() {
        let mut l = ledger();
        assert!(l.set_money_input(MoneyField::BtcCoins, "0.15"));
        assert!(l.set_money_input(MoneyField::BtcCurrentPrice, "67000"));
        assert!(l.set_money_input(MoneyField::BankBalance, "18500"));
        assert!(!l.set_money_input(MoneyField::Savings, "lots"));
        assert!(!l.set_money_input(MoneyField::Savings, ""));
        assert!(!l.set_money_input(MoneyField::Savings, "-1"));
        assert_close(l.net_worth(), 28_550.0);
        assert_eq!(l.state().savings, 0.0);
    }

    #[test]
    fn negative_money_stores_zero() {
        let mut l = ledger();
        l.set_money(MoneyField::FixedBills, -20.0);
        assert_eq!(l.state().fixed_bills, 0.0);
    }

    #[test]
    fn remove_and_toggle_expenses() {
        let mut l = ledger();
        let a = l.add_expense("10", Category::Food, "").unwrap();
        let b = l.add_expense("20", Category::Food, "").unwrap();

        assert!(l.toggle_expense_shared(b));
        assert!(l.state().expenses[1].shared);
        assert_close(l.shared_spending().total_shared, 20.0);

        assert!(l.remove_expense(a));
        assert_eq!(l.state().expenses.len(), 1);
        assert_eq!(l.state().expenses[0].id, b);
    }

    #[test]
    fn unknown_id_is_a_no_op() {
        let mut l = ledger();
        let ghost = uuid::Uuid::new_v4();
        assert!(!l.remove_expense(ghost));
        assert!(!l.toggle_expense_shared(ghost));
        assert!(!l.remove_goal(ghost));
        assert!(!l.remove_transfer(ghost));
        assert!(l.set_goal_current(ghost, 5.0).is_none());
        assert!(l.step_goal(ghost, GoalStep::Up).is_none());
        assert!(l.store().is_empty());
    }

    #[test]
    fn category_totals_and_budgets() {
        let mut l = ledger();
        l.add_expense("100", Category::Groceries, "").unwrap();
        l.add_expense("50", Category::Groceries, "").unwrap();
        assert!(l.set_budget(Category::Groceries, "120"));
        assert!(!l.set_budget(Category::Food, "abc"));

        let totals = l.category_totals();
        assert_close(totals[&Category::Groceries], 150.0);
        assert!(!totals.contains_key(&Category::Transport));

        let status = l.budget_status();
        assert_eq!(status.len(), 1);
        assert!(status[0].over_budget);

        assert!(l.set_budget(Category::Groceries, ""));
        assert!(l.state().budgets.is_empty());
        assert!(!l.clear_budget(Category::Groceries));
    }

    #[test]
    fn income_and_bill_entries() {
        let mut l = ledger();
        let income = l.add_income("", "3000").unwrap();
        l.add_bill("Rent", "1200").unwrap();
        assert!(l.add_bill("Rent", "zero").is_none());

        assert_eq!(l.state().incomes[0].label, "Commission");
        assert_eq!(l.incomes_this_month().len(), 1);
        assert_eq!(l.bills_this_month().len(), 1);
        assert_close(l.money_summary().leftover, 1800.0);

        assert!(l.remove_income(income));
        assert!(l.incomes_this_month().is_empty());
    }

    #[test]
    fn recent_expenses_newest_first() {
        let mut l = ledger();
        l.add_expense("1", Category::Food, "").unwrap();
        l.add_expense("2", Category::Food, "").unwrap();
        l.add_expense("3", Category::Food, "").unwrap();
        let amounts: Vec<f64> = l.recent_expenses(2).iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![3.0, 2.0]);
    }

    #[test]
    fn btc_position_from_manual_price() {
        let mut l = ledger();
        l.set_money(MoneyField::BtcCoins, 0.5);
        l.set_money(MoneyField::BtcBuyPrice, 40_000.0);
        l.set_money(MoneyField::BtcCurrentPrice, 30_000.0);
        let pos = l.btc_position();
        assert_close(pos.gain_loss, -5_000.0);
        assert_close(pos.gain_pct, -25.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Goals and family
// ═══════════════════════════════════════════════════════════════════

mod goals {
    use super::*;

    #[test]
    fn add_goal_defaults_and_validation() {
        let mut l = ledger();
        assert!(l.add_goal("", "1000", "", "").is_none());
        assert!(l.add_goal("Car", "", "", "").is_none());
        assert!(l.add_goal("Car", "1000", "x", "").is_none());
        assert!(l.add_goal("Car", "1000", "", "0").is_none());

        let id = l.add_goal("Car", "1000", "", "").unwrap();
        let goal = &l.state().goals[0];
        assert_eq!(goal.id, id);
        assert_eq!(goal.current, 0.0);
        assert_eq!(goal.months, 12);
    }

    #[test]
    fn current_is_clamped_on_create_and_set() {
        let mut l = ledger();
        let id = l.add_goal("Trip", "800", "5000", "4").unwrap();
        assert_eq!(l.state().goals[0].current, 800.0);
        assert_eq!(l.set_goal_current(id, -10.0), Some(0.0));
        assert_eq!(l.set_goal_current(id, 300.0), Some(300.0));
    }

    #[test]
    fn steps_move_by_monthly_needed() {
        let mut l = ledger();
        let id = l.add_goal("Trip", "1200", "600", "6").unwrap();
        assert_eq!(l.step_goal(id, GoalStep::Up), Some(700.0));
        // needed is now 500 / 6
        let pace = l.goal_pace(id).unwrap();
        assert_close(pace.monthly_needed, 500.0 / 6.0);
        let down = l.step_goal(id, GoalStep::Down).unwrap();
        assert_close(down, 700.0 - 500.0 / 6.0);
    }

    #[test]
    fn pace_uses_configured_horizon() {
        let mut short = ledger();
        let id = short.add_goal("Car", "50000", "12000", "24").unwrap();
        assert!(short.goal_pace(id).unwrap().on_track);

        let mut long = HabitLedger::open_with_config(MemoryStore::new(), PolicyConfig::long_horizon());
        let id = long.add_goal("Car", "50000", "12000", "24").unwrap();
        assert!(!long.goal_pace(id).unwrap().on_track);
        assert_eq!(long.goal_paces().len(), 1);
    }

    #[test]
    fn family_goal_and_transfers() {
        let mut l = ledger();
        let goal = l.add_family_goal("Vacation", "1000").unwrap();
        assert!(l.add_family_goal("  ", "1000").is_none());
        assert!(l.add_transfer(Contributor::Me, "nope", "").is_none());

        l.add_transfer(Contributor::Me, "300", "march").unwrap();
        let t = l.add_transfer(Contributor::Partner, "100", "").unwrap();
        assert_close(l.family_goal_progress(goal).unwrap(), 40.0);

        let split = l.contribution_split();
        assert_close(split.my_percent, 75.0);

        assert!(l.remove_transfer(t));
        assert_close(l.contribution_split().my_percent, 100.0);
        assert!(l.remove_family_goal(goal));
        assert!(l.family_goal_progress(goal).is_none());
    }

    #[test]
    fn contribution_slider_is_clamped() {
        let mut l = ledger();
        l.set_my_contribution_pct(140.0);
        assert_eq!(l.state().my_contribution_pct, 100.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Rides and history
// ═══════════════════════════════════════════════════════════════════

mod rides_and_history {
    use super::*;

    #[test]
    fn rides() {
        let mut l = ledger();
        assert!(l.add_ride(None, "", "25", "", false).is_none());
        l.add_ride(Some(d(2024, 4, 1)), "30", "", "", false).unwrap();
        let race = l.add_ride(None, "90", "33", "crit", true).unwrap();

        let stats = l.ride_stats();
        assert_eq!(stats.total_rides, 2);
        assert_eq!(stats.races, 1);
        assert_close(stats.longest_ride, 90.0);

        assert!(l.remove_ride(race));
        assert_eq!(l.ride_stats().total_rides, 1);
    }

    #[test]
    fn snapshot_requires_income() {
        let mut l = ledger();
        assert!(!l.record_daily_snapshot());
        assert!(l.state().history.is_empty());
    }

    #[test]
    fn snapshot_once_per_day() {
        let mut l = ledger();
        l.set_money(MoneyField::Income, 8000.0);
        assert!(l.record_daily_snapshot());
        assert!(!l.record_daily_snapshot());
        assert_eq!(l.state().history.len(), 1);
        assert_eq!(l.state().last_snapshot_date, Some(d(2024, 4, 15)));

        // a reopened ledger on the same day does not record again
        let mut again = reopen(&l);
        assert!(!again.record_daily_snapshot());
        assert_eq!(again.state().history.len(), 1);
    }

    #[test]
    fn open_records_due_snapshot() {
        let mut store = MemoryStore::new();
        let stored = AppState {
            income: 8000.0,
            bank_balance: 500.0,
            ..AppState::default()
        };
        store
            .set(DEFAULT_STORAGE_KEY, &format::encode(&stored).unwrap())
            .unwrap();

        let l = ledger_on(store);
        assert_eq!(l.state().history.len(), 1);
        assert_eq!(l.state().history[0].date, d(2024, 4, 15));
        assert_eq!(l.state().last_snapshot_date, Some(d(2024, 4, 15)));

        let persisted = format::decode(&stored_text(&l)).unwrap();
        assert_eq!(persisted.history.len(), 1);
    }

    #[test]
    fn open_without_income_records_nothing() {
        let l = ledger();
        assert!(l.state().history.is_empty());
        assert!(l.store().is_empty());
    }

    #[test]
    fn snapshots_roll_over_days_and_window() {
        let config = PolicyConfig {
            history_window: 30,
            ..PolicyConfig::default()
        };
        let mut store = MemoryStore::new();
        let start = d(2024, 1, 1);
        let mut last = start;
        for i in 0..35u64 {
            let day = start + chrono::Days::new(i);
            last = day;
            // from the second day on, opening alone records the snapshot
            let mut l = HabitLedger::open_with_clock(store, config.clone(), move || day);
            l.set_money(MoneyField::Income, 8000.0);
            l.record_daily_snapshot();
            assert_eq!(l.state().history.last().map(|s| s.date), Some(day));
            store = l.store().clone();
        }
        let l = HabitLedger::open_with_clock(store, config, move || last);
        assert_eq!(l.state().history.len(), 30);
        assert_eq!(l.state().history[0].date, d(2024, 1, 6));

        let trends = l.trends();
        assert_eq!(trends.dates.len(), 30);
        assert!(trends.salary.iter().all(|s| *s == 8000.0));
    }
}
