// Trip rollup: merge trip exports, join payment aggregates, resolve
// coordinates, and bucket everything by calendar day.
use crate::address::restaurant_name;
use crate::geocode::GeocodeIndex;
use crate::types::{
    DayBucket, DayStats, DaySummaryRow, OverallStats, PaymentAggregate, RawTripRow, Report,
    TripInfo,
};
use crate::util::{format_duration, format_number, format_time_12h, parse_datetime_safe, parse_f64_safe};
use chrono::{Local, NaiveDateTime, SecondsFormat};
use std::collections::{BTreeMap, HashMap};

/// Counters surfaced after a rollup so the operator can see how well the
/// geocode table covered the trip addresses.
#[derive(Debug, Clone, Default)]
pub struct MatchReport {
    pub completed_trips: usize,
    pub unmatched_pickups: usize,
    pub unmatched_dropoffs: usize,
}

fn text_or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "N/A".to_string(),
    }
}

/// `[longitude, latitude]` ordering matches the GeoJSON-style consumer.
fn to_lon_lat(coords: Option<(f64, f64)>) -> Option<[f64; 2]> {
    coords.map(|(lat, lon)| [lon, lat])
}

/// Build the full day-bucketed report from raw trip tables, the payment
/// aggregates, and the geocode index.
///
/// Only rows with `Trip status == "completed"` participate. Rows whose
/// request time cannot be parsed are counted but not bucketed. Trips inside
/// a day are ordered by the underlying request timestamp; the formatted
/// AM/PM string is display-only and would sort afternoons before mornings.
pub fn build_report(
    trip_tables: &[Vec<RawTripRow>],
    payments: &HashMap<String, PaymentAggregate>,
    index: &GeocodeIndex,
) -> (Report, MatchReport) {
    // BTreeMap keyed by the ISO date string keeps days sorted ascending.
    let mut days: BTreeMap<String, Vec<(Option<NaiveDateTime>, TripInfo)>> = BTreeMap::new();
    let mut match_report = MatchReport::default();

    for row in trip_tables.iter().flatten() {
        if row.trip_status.as_deref().map(str::trim) != Some("completed") {
            continue;
        }
        match_report.completed_trips += 1;

        let request_time = parse_datetime_safe(row.request_time.as_deref());
        let Some(req) = request_time else {
            // No request timestamp means no calendar day to file under.
            continue;
        };
        let dropoff_time = parse_datetime_safe(row.dropoff_time.as_deref());
        let date_key = req.date().to_string();

        let pickup = row.pickup_address.as_deref();
        let dropoff = row.dropoff_address.as_deref();
        let pickup_coords = index.find_coordinates(pickup);
        let dropoff_coords = index.find_coordinates(dropoff);
        if pickup_coords.is_none() {
            match_report.unmatched_pickups += 1;
        }
        if dropoff_coords.is_none() {
            match_report.unmatched_dropoffs += 1;
        }

        let pay = row
            .trip_uuid
            .as_deref()
            .and_then(|uuid| payments.get(uuid.trim()))
            .cloned()
            .unwrap_or_default();

        let info = TripInfo {
            restaurant: restaurant_name(pickup),
            pickup_address: text_or_na(pickup),
            dropoff_address: text_or_na(dropoff),
            request_time: format_time_12h(request_time),
            dropoff_time: format_time_12h(dropoff_time),
            duration: format_duration(request_time, dropoff_time),
            distance: parse_f64_safe(row.trip_distance.as_deref()).unwrap_or(0.0),
            service_type: text_or_na(row.service_type.as_deref()),
            product_type: text_or_na(row.product_type.as_deref()),
            trip_uuid: text_or_na(row.trip_uuid.as_deref()),
            pickup_coords: to_lon_lat(pickup_coords),
            dropoff_coords: to_lon_lat(dropoff_coords),
            total_pay: pay.total_pay,
            base_fare: pay.base_fare,
            tip: pay.tip,
            incentive: pay.incentive,
            quest: pay.quest,
            order_refund: pay.order_refund,
        };
        days.entry(date_key).or_default().push((request_time, info));
    }

    let mut buckets: Vec<DayBucket> = Vec::with_capacity(days.len());
    let mut overall = OverallStats::default();
    for (date, mut trips) in days {
        trips.sort_by_key(|(ts, _)| *ts);
        let mut stats = DayStats::default();
        let trips: Vec<TripInfo> = trips
            .into_iter()
            .map(|(_, info)| {
                stats.total_earnings += info.total_pay;
                stats.total_tips += info.tip;
                stats.total_distance += info.distance;
                stats.trip_count += 1;
                info
            })
            .collect();
        overall.total_earnings += stats.total_earnings;
        overall.total_tips += stats.total_tips;
        overall.total_distance += stats.total_distance;
        overall.total_trips += stats.trip_count;
        buckets.push(DayBucket { date, trips, stats });
    }
    overall.total_days = buckets.len();

    let report = Report {
        generated: Local::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        stats: overall,
        days: buckets,
    };
    (report, match_report)
}

/// One console-preview row per day bucket.
pub fn day_summaries(report: &Report) -> Vec<DaySummaryRow> {
    report
        .days
        .iter()
        .map(|d| DaySummaryRow {
            date: d.date.clone(),
            trips: d.stats.trip_count,
            earnings: format_number(d.stats.total_earnings, 2),
            tips: format_number(d.stats.total_tips, 2),
            distance: format_number(d.stats.total_distance, 1),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::aggregate_payments;
    use crate::types::RawPaymentRow;

    fn trip(uuid: &str, status: &str, req: &str, drop: &str, pickup: &str) -> RawTripRow {
        RawTripRow {
            trip_uuid: Some(uuid.to_string()),
            trip_status: Some(status.to_string()),
            request_time: Some(req.to_string()),
            dropoff_time: Some(drop.to_string()),
            pickup_address: Some(pickup.to_string()),
            dropoff_address: Some("456 Oak Ave, Springfield".to_string()),
            trip_distance: Some("3.2".to_string()),
            service_type: Some("Delivery".to_string()),
            product_type: Some("UberX".to_string()),
        }
    }

    fn payment(uuid: &str, paid: &str, tip: &str) -> RawPaymentRow {
        RawPaymentRow {
            trip_uuid: Some(uuid.to_string()),
            description: Some("Payment for completed order".to_string()),
            paid_to_you: Some(paid.to_string()),
            fare: Some(paid.to_string()),
            tip: Some(tip.to_string()),
            incentive: None,
            quest: None,
            order_value_refund: None,
        }
    }

    #[test]
    fn same_day_trips_share_a_bucket() {
        let trips = vec![vec![
            trip("t-2", "completed", "2024-01-01 12:30:00", "2024-01-01 12:50:00", "A"),
            trip("t-1", "completed", "2024-01-01 09:00:00", "2024-01-01 09:45:00", "B"),
            trip("t-3", "completed", "2024-01-02 08:00:00", "2024-01-02 08:20:00", "C"),
        ]];
        let payments = aggregate_payments(&[vec![
            payment("t-1", "10.50", "0"),
            payment("t-2", "8.25", "0"),
        ]]);
        let (report, _) = build_report(&trips, &payments, &GeocodeIndex::default());

        assert_eq!(report.days.len(), 2);
        let day1 = &report.days[0];
        assert_eq!(day1.date, "2024-01-01");
        assert_eq!(day1.stats.trip_count, 2);
        assert!((day1.stats.total_earnings - 18.75).abs() < 1e-9);
        // Ordered by underlying timestamp, morning first.
        assert_eq!(day1.trips[0].trip_uuid, "t-1");
        assert_eq!(day1.trips[0].request_time, "09:00 AM");
        assert_eq!(day1.trips[1].request_time, "12:30 PM");
        assert_eq!(report.days[1].date, "2024-01-02");
    }

    #[test]
    fn timestamp_sort_beats_lexical_display_order() {
        let trips = vec![vec![
            trip("t-pm", "completed", "2024-03-05 13:00:00", "2024-03-05 13:30:00", "A"),
            trip("t-am", "completed", "2024-03-05 09:00:00", "2024-03-05 09:30:00", "B"),
        ]];
        let (report, _) = build_report(&trips, &HashMap::new(), &GeocodeIndex::default());
        let day = &report.days[0];
        // "01:00 PM" sorts before "09:00 AM" lexically; chronological order
        // must hold regardless.
        assert_eq!(day.trips[0].trip_uuid, "t-am");
        assert_eq!(day.trips[1].request_time, "01:00 PM");
    }

    #[test]
    fn overall_stats_are_sums_of_day_stats() {
        let trips = vec![vec![
            trip("t-1", "completed", "2024-01-01 09:00:00", "2024-01-01 09:30:00", "A"),
            trip("t-2", "completed", "2024-01-02 10:00:00", "2024-01-02 10:30:00", "B"),
            trip("t-3", "completed", "2024-01-03 11:00:00", "2024-01-03 11:30:00", "C"),
        ]];
        let payments = aggregate_payments(&[vec![
            payment("t-1", "10.00", "1.00"),
            payment("t-2", "20.00", "2.00"),
            payment("t-3", "30.00", "3.00"),
        ]]);
        let (report, _) = build_report(&trips, &payments, &GeocodeIndex::default());

        let earnings: f64 = report.days.iter().map(|d| d.stats.total_earnings).sum();
        let tips: f64 = report.days.iter().map(|d| d.stats.total_tips).sum();
        let distance: f64 = report.days.iter().map(|d| d.stats.total_distance).sum();
        let count: usize = report.days.iter().map(|d| d.stats.trip_count).sum();
        assert_eq!(report.stats.total_earnings, earnings);
        assert_eq!(report.stats.total_tips, tips);
        assert_eq!(report.stats.total_distance, distance);
        assert_eq!(report.stats.total_trips, count);
        assert_eq!(report.stats.total_days, report.days.len());
    }

    #[test]
    fn unpaid_trip_has_all_zero_monetary_fields() {
        let trips = vec![vec![trip(
            "t-unpaid",
            "completed",
            "2024-01-01 09:00:00",
            "2024-01-01 09:30:00",
            "A",
        )]];
        let (report, _) = build_report(&trips, &HashMap::new(), &GeocodeIndex::default());
        let t = &report.days[0].trips[0];
        assert_eq!(t.total_pay, 0.0);
        assert_eq!(t.base_fare, 0.0);
        assert_eq!(t.tip, 0.0);
        assert_eq!(t.incentive, 0.0);
        assert_eq!(t.quest, 0.0);
        assert_eq!(t.order_refund, 0.0);
    }

    #[test]
    fn non_completed_and_undated_trips_are_excluded_from_buckets() {
        let trips = vec![vec![
            trip("t-1", "canceled", "2024-01-01 09:00:00", "2024-01-01 09:30:00", "A"),
            trip("t-2", "completed", "garbage", "2024-01-01 09:30:00", "B"),
            trip("t-3", "completed", "2024-01-01 10:00:00", "2024-01-01 10:30:00", "C"),
        ]];
        let (report, matches) = build_report(&trips, &HashMap::new(), &GeocodeIndex::default());
        assert_eq!(report.stats.total_trips, 1);
        // The undated row still counts as a completed trip in diagnostics.
        assert_eq!(matches.completed_trips, 2);
    }

    #[test]
    fn missing_fields_degrade_to_defaults() {
        let trips = vec![vec![RawTripRow {
            trip_uuid: None,
            trip_status: Some("completed".into()),
            request_time: Some("2024-01-01 09:00:00".into()),
            dropoff_time: None,
            pickup_address: None,
            dropoff_address: None,
            trip_distance: None,
            service_type: None,
            product_type: None,
        }]];
        let (report, matches) = build_report(&trips, &HashMap::new(), &GeocodeIndex::default());
        let t = &report.days[0].trips[0];
        assert_eq!(t.restaurant, "Unknown");
        assert_eq!(t.pickup_address, "N/A");
        assert_eq!(t.dropoff_time, "N/A");
        assert_eq!(t.duration, "N/A");
        assert_eq!(t.distance, 0.0);
        assert_eq!(t.service_type, "N/A");
        assert_eq!(t.trip_uuid, "N/A");
        assert_eq!(t.pickup_coords, None);
        assert_eq!(t.dropoff_coords, None);
        assert_eq!(matches.unmatched_pickups, 1);
        assert_eq!(matches.unmatched_dropoffs, 1);
    }

    #[test]
    fn coordinates_are_lon_lat_pairs() {
        use crate::types::RawGeocodeRow;
        let index = GeocodeIndex::build(&[RawGeocodeRow {
            address: Some("123 main st".into()),
            latitude: Some("40.5".into()),
            longitude: Some("-89.6".into()),
        }]);
        let trips = vec![vec![trip(
            "t-1",
            "completed",
            "2024-01-01 09:00:00",
            "2024-01-01 09:30:00",
            "123 Main St",
        )]];
        let (report, _) = build_report(&trips, &HashMap::new(), &index);
        assert_eq!(report.days[0].trips[0].pickup_coords, Some([-89.6, 40.5]));
    }

    #[test]
    fn empty_inputs_produce_empty_report() {
        let (report, matches) = build_report(&[], &HashMap::new(), &GeocodeIndex::default());
        assert!(report.days.is_empty());
        assert_eq!(report.stats.total_trips, 0);
        assert_eq!(report.stats.total_days, 0);
        assert_eq!(matches.completed_trips, 0);
        assert!(day_summaries(&report).is_empty());
    }

    #[test]
    fn restaurant_and_duration_display_fields() {
        let trips = vec![vec![trip(
            "t-1",
            "completed",
            "2024-01-01 09:00:00",
            "2024-01-01 10:15:00",
            "Tasty Diner (123 Main St), Springfield",
        )]];
        let (report, _) = build_report(&trips, &HashMap::new(), &GeocodeIndex::default());
        let t = &report.days[0].trips[0];
        assert_eq!(t.restaurant, "Tasty Diner");
        assert_eq!(t.duration, "1h 15m");
    }
}
