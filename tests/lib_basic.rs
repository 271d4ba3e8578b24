#![forbid(unsafe_code)]
use chrono::{NaiveDate, Weekday};
use roulement::{
    compute_holiday_map, detect_conflicts, generate_month, model::RejectReason, Calendar,
    HolidayCalendar, RequestBook, RequestParser, RosterConfig, RosterError, RosterInputs,
    RosterOutcome, ShiftCode, ShiftSlot, StaffId, StationId,
};
use std::collections::{BTreeMap, BTreeSet};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn no_weekend() -> HolidayCalendar {
    HolidayCalendar::default().with_weekend(Vec::<Weekday>::new())
}

fn staff_on(outcome: &RosterOutcome, date: NaiveDate) -> BTreeSet<StaffId> {
    outcome
        .day(date)
        .unwrap()
        .assignments
        .iter()
        .map(|a| a.staff)
        .collect()
}

#[test]
fn single_staff_takes_one_slot_per_day() {
    let cal = no_weekend();
    let outcome =
        generate_month(RosterConfig::new(2025, 12, 1, 1), &cal, &RequestBook::default()).unwrap();
    assert_eq!(outcome.days.len(), 31);
    let a1_day = ShiftSlot::new(StationId::new(1), ShiftCode::Day);
    for day in &outcome.days {
        assert_eq!(day.assignments.len(), 1);
        assert_eq!(day.assignments[0].staff, StaffId::new(1));
        assert_eq!(day.assignments[0].slot, a1_day);
        assert!(day.office.is_empty());
        let missing: usize = day.unfilled(&outcome.slots).iter().map(|(_, n)| n).sum();
        assert_eq!(missing, 3);
    }
    assert_eq!(outcome.staff_totals[0].count, 31);
}

#[test]
fn special_request_is_pinned_and_overflow_dropped() {
    let inputs = RosterInputs {
        year_month: "2025-12".into(),
        staff_count: 40,
        station_count: 5,
        start_staff: "S20".into(),
        single_shift_stations: String::new(),
        special_requests: "S5 2025-12-24 A5 Day\n\
                           S6 2025-12-24 A5 Day\n\
                           S5 2025-12-24 A5 Day\n\
                           S7 2025-12-24 A5 Day"
            .into(),
        calendar: HolidayCalendar::default(),
    };
    let outcome = inputs.generate().unwrap();
    let eve = outcome.day(d(2025, 12, 24)).unwrap();
    let a5_day = ShiftSlot::new(StationId::new(5), ShiftCode::Day);

    let pinned: Vec<_> = eve.assignments_for(a5_day).collect();
    assert_eq!(pinned.len(), 2);
    assert_eq!(pinned[0].staff, StaffId::new(5));
    assert_eq!(pinned[1].staff, StaffId::new(6));
    assert!(pinned.iter().all(|a| a.special));

    let reasons: Vec<_> = outcome.rejected_requests.iter().map(|r| r.reason).collect();
    assert_eq!(reasons, vec![RejectReason::AlreadyAssigned, RejectReason::SlotFull]);

    // S7 écarté reste candidat au remplissage automatique
    let s7 = eve.assignment_of(StaffId::new(7));
    assert!(s7.map_or(true, |a| !a.special));

    let s5 = outcome.total_for(StaffId::new(5)).unwrap();
    assert!(s5
        .details
        .iter()
        .any(|r| r.date == d(2025, 12, 24) && r.slot == a5_day && r.special));
}

#[test]
fn third_day_of_block_rests_one_working_day_later() {
    // vendredi 5 décembre férié + week-end : bloc de 3 jours, récupérations lundi 8 / mardi 9
    let cal = HolidayCalendar::new([d(2025, 12, 5)]);
    let outcome =
        generate_month(RosterConfig::new(2025, 12, 60, 3), &cal, &RequestBook::default()).unwrap();

    let first_two: BTreeSet<_> = staff_on(&outcome, d(2025, 12, 5))
        .union(&staff_on(&outcome, d(2025, 12, 6)))
        .copied()
        .collect();
    let third = staff_on(&outcome, d(2025, 12, 7));
    let monday = outcome.day(d(2025, 12, 8)).unwrap();
    let tuesday = outcome.day(d(2025, 12, 9)).unwrap();

    assert!(!third.is_empty());
    for staff in &first_two {
        assert!(monday.on_leave.contains(staff));
    }
    for staff in third.difference(&first_two) {
        assert!(tuesday.on_leave.contains(staff));
        assert!(!monday.on_leave.contains(staff));
    }
}

#[test]
fn invariants_hold_on_a_busy_month() {
    let mut calendar = HolidayCalendar::new([d(2025, 12, 25), d(2025, 12, 26)]);
    calendar.add_holiday(d(2025, 12, 31));
    let inputs = RosterInputs {
        year_month: "2025-12".into(),
        staff_count: 45,
        station_count: 6,
        start_staff: "S23".into(),
        single_shift_stations: "A2, A6".into(),
        special_requests: "S1 2025-12-25 A1 Night\nS2 2025-12-25 A1 Night\nS3 2025-12-25 A1 Night\n\
                           S9 2025-12-29 A3 Day\nS10 2025-12-06 A6 Night"
            .into(),
        calendar: calendar.clone(),
    };
    let outcome = inputs.generate().unwrap();
    assert!(detect_conflicts(&outcome)
        .iter()
        .all(|c| c.kind == roulement::ConflictKind::Unfilled));

    let holiday_map = compute_holiday_map(&calendar, 2025, 12);
    let mut counts: BTreeMap<StaffId, u32> = BTreeMap::new();
    let mut expected_leave: BTreeMap<StaffId, BTreeSet<NaiveDate>> = BTreeMap::new();
    let mut actual_leave: BTreeMap<StaffId, BTreeSet<NaiveDate>> = BTreeMap::new();

    for day in &outcome.days {
        let mut seen = BTreeSet::new();
        for slot in &outcome.slots {
            assert!(day.assignments_for(*slot).count() <= 2);
        }
        for a in &day.assignments {
            assert!(seen.insert(a.staff), "{} twice on {}", a.staff, day.date);
            assert!(!day.on_leave.contains(&a.staff));
            *counts.entry(a.staff).or_default() += 1;
            if day.is_holiday {
                let entry = holiday_map[&day.date];
                expected_leave.entry(a.staff).or_default().insert(entry.lieu_date);
            }
        }
        if !day.on_leave.is_empty() {
            assert!(calendar.is_working_day(day.date));
        }
        for staff in &day.on_leave {
            assert!(actual_leave.entry(*staff).or_default().insert(day.date));
        }
        if day.is_working_day {
            assert_eq!(day.assignments.len() + day.on_leave.len() + day.office.len(), 45);
        } else {
            assert!(day.office.is_empty());
        }
    }

    for total in &outcome.staff_totals {
        assert_eq!(counts.get(&total.staff).copied().unwrap_or(0), total.count);
        assert!(total.details.windows(2).all(|w| w[0].date <= w[1].date));
    }

    let month_end = d(2025, 12, 31);
    for (staff, dates) in &expected_leave {
        let in_month: BTreeSet<_> = dates.iter().copied().filter(|x| *x <= month_end).collect();
        assert_eq!(actual_leave.get(staff).cloned().unwrap_or_default(), in_month);
    }
    assert!(outcome
        .outstanding_accruals
        .iter()
        .all(|o| o.accrual.lieu_date > month_end));
    assert!(!outcome.outstanding_accruals.is_empty());
}

#[test]
fn workload_stays_balanced_without_requests_or_leave() {
    let cal = no_weekend();
    let config = RosterConfig::new(2026, 3, 17, 3)
        .with_single_shift_stations([StationId::new(2)])
        .with_start_staff(StaffId::new(9));
    let outcome = generate_month(config, &cal, &RequestBook::default()).unwrap();

    let mut counts = vec![0u32; 17];
    for day in &outcome.days {
        for a in &day.assignments {
            counts[a.staff.index()] += 1;
        }
        let max = counts.iter().max().unwrap();
        let min = counts.iter().min().unwrap();
        assert!(max - min <= 1, "unbalanced on {}: {counts:?}", day.date);
    }
}

#[test]
fn identical_inputs_give_identical_rosters() {
    let inputs = RosterInputs {
        year_month: "2026-01".into(),
        staff_count: 33,
        station_count: 4,
        start_staff: "S11".into(),
        single_shift_stations: "A4".into(),
        special_requests: "S2 2026-01-15 A1 Day".into(),
        calendar: HolidayCalendar::new([d(2026, 1, 1)]),
    };
    let a = inputs.generate().unwrap();
    let b = inputs.generate().unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(a.days, b.days);
    assert_eq!(a.staff_totals, b.staff_totals);
}

#[test]
fn zero_staff_fails_before_planning() {
    let cal = HolidayCalendar::default();
    let err = generate_month(RosterConfig::new(2025, 12, 0, 4), &cal, &RequestBook::default())
        .unwrap_err();
    assert!(matches!(err, RosterError::NoStaff));
    assert_eq!(err.to_string(), "staff count must be greater than zero");
}

#[test]
fn parser_output_feeds_engine() {
    let parser = RequestParser::new(4, 2);
    let parsed = parser.parse_special_requests("S4 2025-12-02 A2 早\nS9 2025-12-02 A1 Day");
    assert_eq!(parsed.warnings.len(), 1);
    let cal = HolidayCalendar::default();
    let outcome = generate_month(RosterConfig::new(2025, 12, 4, 2), &cal, &parsed.value).unwrap();
    let day = outcome.day(d(2025, 12, 2)).unwrap();
    let s4 = day.assignment_of(StaffId::new(4)).unwrap();
    assert!(s4.special);
    assert_eq!(s4.slot, ShiftSlot::new(StationId::new(2), ShiftCode::Day));
}
