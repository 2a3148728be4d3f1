use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Deserialize)]
pub struct RawGeocodeRow {
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawPaymentRow {
    #[serde(rename = "Trip UUID")]
    pub trip_uuid: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "Paid to you")]
    pub paid_to_you: Option<String>,
    #[serde(rename = "Paid to you:Your earnings:Fare:Fare")]
    pub fare: Option<String>,
    #[serde(rename = "Paid to you:Your earnings:Tip")]
    pub tip: Option<String>,
    #[serde(rename = "Paid to you:Your earnings:Promotion:Incentive")]
    pub incentive: Option<String>,
    #[serde(rename = "Paid to you:Your earnings:Promotion:Quest")]
    pub quest: Option<String>,
    #[serde(rename = "Paid to you:Trip balance:Refunds:Order Value")]
    pub order_value_refund: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawTripRow {
    #[serde(rename = "Trip UUID")]
    pub trip_uuid: Option<String>,
    #[serde(rename = "Trip status")]
    pub trip_status: Option<String>,
    #[serde(rename = "Trip request time")]
    pub request_time: Option<String>,
    #[serde(rename = "Trip drop off time")]
    pub dropoff_time: Option<String>,
    #[serde(rename = "Pickup address")]
    pub pickup_address: Option<String>,
    #[serde(rename = "Drop off address")]
    pub dropoff_address: Option<String>,
    #[serde(rename = "Trip distance")]
    pub trip_distance: Option<String>,
    #[serde(rename = "Service type")]
    pub service_type: Option<String>,
    #[serde(rename = "Product Type")]
    pub product_type: Option<String>,
}

/// Per-trip sums of the revenue-bearing payment line items. A trip with no
/// qualifying payment rows simply has no aggregate.
#[derive(Debug, Clone, Default)]
pub struct PaymentAggregate {
    pub total_pay: f64,
    pub base_fare: f64,
    pub tip: f64,
    pub incentive: f64,
    pub quest: f64,
    pub order_refund: f64,
}

/// Presentation-ready form of one completed trip, as it appears inside a
/// day bucket of the output document.
#[derive(Debug, Serialize, Clone)]
pub struct TripInfo {
    pub restaurant: String,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub request_time: String,
    pub dropoff_time: String,
    pub duration: String,
    pub distance: f64,
    pub service_type: String,
    pub product_type: String,
    pub trip_uuid: String,
    /// `[longitude, latitude]`, or null when no geocode candidate matched.
    pub pickup_coords: Option<[f64; 2]>,
    pub dropoff_coords: Option<[f64; 2]>,
    pub total_pay: f64,
    pub base_fare: f64,
    pub tip: f64,
    pub incentive: f64,
    pub quest: f64,
    pub order_refund: f64,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct DayStats {
    pub total_earnings: f64,
    pub total_tips: f64,
    pub total_distance: f64,
    pub trip_count: usize,
}

#[derive(Debug, Serialize, Clone)]
pub struct DayBucket {
    pub date: String,
    pub trips: Vec<TripInfo>,
    pub stats: DayStats,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct OverallStats {
    pub total_earnings: f64,
    pub total_tips: f64,
    pub total_distance: f64,
    pub total_trips: usize,
    pub total_days: usize,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub generated: String,
    pub stats: OverallStats,
    pub days: Vec<DayBucket>,
}

/// Console preview row: one line per day in the report.
#[derive(Debug, Tabled, Clone)]
pub struct DaySummaryRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Trips")]
    pub trips: usize,
    #[tabled(rename = "Earnings")]
    pub earnings: String,
    #[tabled(rename = "Tips")]
    pub tips: String,
    #[tabled(rename = "Distance")]
    pub distance: String,
}
