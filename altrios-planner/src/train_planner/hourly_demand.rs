use super::planner_imports::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

/// Share of an origin-destination pair's weekly demand shipped on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDemandShare {
    #[serde(rename = "Origin")]
    pub origin: NodeId,
    #[serde(rename = "Destination")]
    pub destination: NodeId,
    #[serde(rename = "Day of Week")]
    pub day_of_week: Weekday,
    #[serde(rename = "Percentage")]
    pub percentage: f64,
}

/// Share of an origin-destination pair's daily demand shipped in one hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyDemandShare {
    #[serde(rename = "Origin")]
    pub origin: NodeId,
    #[serde(rename = "Destination")]
    pub destination: NodeId,
    #[serde(rename = "Hour of Day")]
    pub hour_of_day: u32,
    #[serde(rename = "Percentage_of_Hour")]
    pub percentage_of_hour: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyDemandRecord {
    #[serde(rename = "Origin")]
    pub origin: NodeId,
    #[serde(rename = "Destination")]
    pub destination: NodeId,
    #[serde(rename = "Train_Type")]
    pub train_type: TrainType,
    /// Hours since the start of the week, counted per origin-destination pair
    #[serde(rename = "Hour")]
    pub hour: u32,
    #[serde(rename = "Number_of_Cars")]
    pub number_of_cars: u32,
    #[serde(rename = "Number_of_Containers")]
    pub number_of_containers: u32,
}

/// Spreads total container demand over days of the week and hours of the
/// day.  Pairs missing either density are dropped.  Each car carries one
/// container.
pub fn prep_hourly_demand(
    total_demand: &[DemandRecord],
    hourly_density: &[HourlyDemandShare],
    daily_density: &[DailyDemandShare],
) -> Vec<HourlyDemandRecord> {
    let mut hourly = vec![];
    for r in total_demand {
        let same_od = |o: &NodeId, d: &NodeId| *o == r.origin && *d == r.destination;
        let mut days: Vec<&DailyDemandShare> = daily_density
            .iter()
            .filter(|s| same_od(&s.origin, &s.destination))
            .collect();
        days.sort_by_key(|s| s.day_of_week);
        let mut hours: Vec<&HourlyDemandShare> = hourly_density
            .iter()
            .filter(|s| same_od(&s.origin, &s.destination))
            .collect();
        hours.sort_by_key(|s| s.hour_of_day);

        let mut hour = 0;
        for day in &days {
            let containers_daily = (r.number_of_containers as f64 * day.percentage).round();
            for share in &hours {
                let containers = (containers_daily * share.percentage_of_hour).round() as u32;
                hourly.push(HourlyDemandRecord {
                    origin: r.origin.clone(),
                    destination: r.destination.clone(),
                    train_type: r.train_type,
                    hour,
                    number_of_cars: containers,
                    number_of_containers: containers,
                });
                hour += 1;
            }
        }
    }
    hourly
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prep_hourly_demand() {
        let demand = vec![
            DemandRecord::new("A", "B", TrainType::Intermodal, 100, 200),
            DemandRecord::new("B", "A", TrainType::Intermodal, 50, 100),
        ];
        let daily = vec![
            DailyDemandShare {
                origin: "A".into(),
                destination: "B".into(),
                day_of_week: Weekday::Tue,
                percentage: 0.25,
            },
            DailyDemandShare {
                origin: "A".into(),
                destination: "B".into(),
                day_of_week: Weekday::Mon,
                percentage: 0.75,
            },
        ];
        let hourly = vec![
            HourlyDemandShare {
                origin: "A".into(),
                destination: "B".into(),
                hour_of_day: 13,
                percentage_of_hour: 0.6,
            },
            HourlyDemandShare {
                origin: "A".into(),
                destination: "B".into(),
                hour_of_day: 8,
                percentage_of_hour: 0.4,
            },
        ];
        let result = prep_hourly_demand(&demand, &hourly, &daily);
        // B -> A has no density and is dropped
        assert_eq!(result.len(), 4);
        let containers: Vec<u32> = result.iter().map(|r| r.number_of_containers).collect();
        // Mon: 150 containers split 60/90, Tue: 50 split 20/30
        assert_eq!(containers, vec![60, 90, 20, 30]);
        assert_eq!(
            result.iter().map(|r| r.hour).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
        assert!(result.iter().all(|r| r.number_of_cars == r.number_of_containers));
    }
}
