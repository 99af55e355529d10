use proptest::prelude::*;

use sis_client::ClientError;
use sis_core::{
    AlertChannel, FetchTicket, PAGE_SIZE_OPTIONS, PaginatedListController, PaginationState,
    clamp_page_index, page_count,
};
use sis_model::{College, PageQuery, SearchEnvelope, SortDirection};

const SEARCHES: [&str; 3] = ["", "engineering", "arts"];

#[derive(Debug, Clone)]
enum Op {
    Search(usize),
    Direction(bool),
    PageSize(usize),
    Page(usize),
    Refresh,
    Complete(usize),
    Fail(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..SEARCHES.len()).prop_map(Op::Search),
        any::<bool>().prop_map(Op::Direction),
        prop::sample::select(PAGE_SIZE_OPTIONS.to_vec()).prop_map(Op::PageSize),
        (0usize..15).prop_map(Op::Page),
        Just(Op::Refresh),
        any::<usize>().prop_map(Op::Complete),
        any::<usize>().prop_map(Op::Fail),
    ]
}

/// Rows are stamped with the filter they were fetched under.
fn stamp(query: &PageQuery) -> String {
    format!("{:?}", query.filter())
}

fn total_for(query: &PageQuery) -> usize {
    match query.search_term() {
        None => 47,
        Some("engineering") => 12,
        Some(_) => 0,
    }
}

fn respond(query: &PageQuery) -> Result<SearchEnvelope<College>, ClientError> {
    let total_count = total_for(query);
    let count = total_count
        .saturating_sub(query.offset())
        .min(query.page_size);
    let rows = (0..count)
        .map(|i| College {
            college_code: format!("P{}R{i}", query.page_index),
            college_name: stamp(query),
        })
        .collect();
    Ok(SearchEnvelope { rows, total_count })
}

proptest! {
    #[test]
    fn clamped_index_is_always_in_range(
        total in 0usize..500,
        size in prop::sample::select(PAGE_SIZE_OPTIONS.to_vec()),
        requested in any::<usize>(),
    ) {
        let state = PaginationState { page_index: 0, page_size: size, total_count: total };
        let index = state.clamped(requested);
        prop_assert!(index < page_count(total, size).max(1));
        prop_assert!(index <= requested);
    }

    #[test]
    fn signed_requests_clamp_to_valid_pages(requested in any::<i64>(), pages in 0usize..50) {
        let index = clamp_page_index(requested, pages);
        prop_assert!(index < pages.max(1));
        if requested <= 0 {
            prop_assert_eq!(index, 0);
        }
    }

    #[test]
    fn displayed_rows_always_match_active_filter(ops in prop::collection::vec(op(), 1..60)) {
        let mut controller = PaginatedListController::<College>::new(5);
        let mut alerts = AlertChannel::<()>::default();
        let mut outstanding: Vec<FetchTicket> = controller.start();

        for op in ops {
            match op {
                Op::Search(i) => outstanding.extend(controller.set_search_query(SEARCHES[i])),
                Op::Direction(desc) => {
                    let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
                    outstanding.extend(controller.set_sort_direction(direction));
                }
                Op::PageSize(size) => outstanding.extend(controller.set_page_size(size)),
                Op::Page(index) => outstanding.extend(controller.set_page_index(index)),
                Op::Refresh => outstanding.extend(controller.refresh()),
                Op::Complete(pick) | Op::Fail(pick) if !outstanding.is_empty() => {
                    let ticket = outstanding.remove(pick % outstanding.len());
                    let result = if matches!(op, Op::Fail(_)) {
                        Err(ClientError::Network("reset".to_string()))
                    } else {
                        respond(&ticket.query)
                    };
                    let completion = controller.complete(ticket, result, &mut alerts);
                    outstanding.extend(completion.follow_up);
                }
                Op::Complete(_) | Op::Fail(_) => {}
            }

            let expected = stamp(controller.query());
            for row in controller.current_page_rows() {
                prop_assert_eq!(&row.college_name, &expected);
            }
            if !controller.loading() {
                prop_assert!(controller.page_index() < controller.page_count().max(1));
            } else {
                prop_assert_eq!(controller.total_count(), 0);
                prop_assert!(controller.current_page_rows().is_empty());
            }
        }
    }
}
