use ephemera_context::{CalendarDate, ContextError, NormalizedContext};
use ephemera_navigator::{Clock, FixedClock, Status, TimeTravelMachine, ViewMode};
use proptest::prelude::*;
use std::sync::Arc;

const TODAY: &str = "2026-10-16";

fn today() -> CalendarDate {
    TODAY.parse().unwrap()
}

fn machine() -> TimeTravelMachine {
    TimeTravelMachine::new(Arc::new(FixedClock::new(today()))).0
}

fn days_before_today(days: u64) -> CalendarDate {
    CalendarDate::from_naive(today().as_naive() - chrono::Days::new(days))
}

fn context_for(date: CalendarDate) -> NormalizedContext {
    NormalizedContext {
        context_id: format!("ctx-{date}"),
        date,
        theme: String::new(),
        summary: String::new(),
        news_items: Vec::new(),
        model_url: String::new(),
        generation_prompt: String::new(),
    }
}

#[derive(Debug, Clone)]
enum Step {
    Prev,
    Next,
    Today,
    GoBack(u64),
    Link(String),
    Succeed,
    Fail,
    Cancel,
    Detail,
    CloseDetail,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Prev),
        Just(Step::Next),
        Just(Step::Today),
        (0u64..4000).prop_map(Step::GoBack),
        prop_oneof![
            Just("2026-02-30".to_string()),
            Just("yesterday".to_string()),
            Just("2024-02-29".to_string()),
        ]
        .prop_map(Step::Link),
        Just(Step::Succeed),
        Just(Step::Fail),
        Just(Step::Cancel),
        Just(Step::Detail),
        Just(Step::CloseDetail),
    ]
}

proptest! {
    #[test]
    fn prop_prev_then_next_returns_to_past_date(days_back in 1u64..20_000) {
        let mut m = machine();
        let d = days_before_today(days_back);
        m.go_to(d);

        m.prev().unwrap();
        m.next().unwrap();
        prop_assert_eq!(m.state().selected_date, d);
    }

    #[test]
    fn prop_is_today_tracks_selected_date(days_back in 0u64..2000) {
        let clock = Arc::new(FixedClock::new(today()));
        let (mut m, _) = TimeTravelMachine::new(clock.clone());
        let d = days_before_today(days_back);
        let ticket = m.go_to(d).unwrap();

        prop_assert_eq!(m.state().is_today, days_back == 0);
        prop_assert_eq!(m.state().is_today, clock.is_today(&d));
        prop_assert_eq!(ticket.request_date.is_none(), days_back == 0);
    }

    #[test]
    fn prop_state_stays_consistent(steps in prop::collection::vec(step(), 1..60)) {
        let mut m = machine();
        let mut ticket = None;

        for step in steps {
            match step {
                Step::Prev => ticket = m.prev().or(ticket),
                Step::Next => ticket = m.next().or(ticket),
                Step::Today => ticket = m.go_to_today().or(ticket),
                Step::GoBack(n) => {
                    let d = days_before_today(n);
                    ticket = m.go_to(d).or(ticket);
                }
                Step::Link(raw) => ticket = m.go_to_link(&raw).or(ticket),
                Step::Succeed => {
                    if let Some(t) = ticket {
                        m.commit(&t, Ok(context_for(t.date)));
                    }
                }
                Step::Fail => {
                    if let Some(t) = ticket {
                        m.commit(&t, Err(ContextError::transport("reset")));
                    }
                }
                Step::Cancel => {
                    if let Some(t) = ticket {
                        m.commit(&t, Err(ContextError::Cancelled));
                    }
                }
                Step::Detail => {
                    m.open_detail();
                }
                Step::CloseDetail => {
                    m.close_detail();
                }
            }

            let state = m.state();
            prop_assert!(state.is_consistent(), "inconsistent: {:?}", state);
            prop_assert!(state.selected_date <= today());
            if state.view == ViewMode::Detail {
                prop_assert_eq!(state.status, Status::Success);
            }
        }
    }
}

#[test]
fn test_next_never_passes_today() {
    let mut m = machine();
    for _ in 0..5 {
        assert!(m.next().is_none());
    }
    assert_eq!(m.state().selected_date, today());
    assert_eq!(m.state().status, Status::Loading);
}

#[test]
fn test_not_found_on_fifth_of_january_is_void() {
    let mut m = machine();
    let ticket = m.go_to("2026-01-05".parse().unwrap()).unwrap();
    m.commit(&ticket, Err(ContextError::not_found("void")));

    let state = m.snapshot();
    assert_eq!(state.status, Status::Void);
    assert!(state.context.is_none());
    assert!(state.last_error.is_some());
}
