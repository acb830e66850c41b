//! Conversion of planner tables to `polars` DataFrames with the column names
//! the dispatch and train simulation models read.

use super::demand_trains::TrainDemandRecord;
use super::hourly_demand::HourlyDemandRecord;
use super::loco_pool::LocomotiveRecord;
use super::planner_imports::*;
use super::rebalancing::BalanceEntry;
use super::refuelers::RefuelerRecord;

pub trait ToDataFrame {
    fn to_dataframe(&self) -> PlannerResult<DataFrame>;
}

fn strs<'a, T, F: Fn(&'a T) -> &'a str>(rows: &'a [T], f: F) -> Vec<&'a str> {
    rows.iter().map(f).collect()
}

fn labels<T, F: Fn(&T) -> String>(rows: &[T], f: F) -> Vec<String> {
    rows.iter().map(f).collect()
}

fn values<T, V, F: Fn(&T) -> V>(rows: &[T], f: F) -> Vec<V> {
    rows.iter().map(f).collect()
}

impl ToDataFrame for [DemandRecord] {
    fn to_dataframe(&self) -> PlannerResult<DataFrame> {
        Ok(DataFrame::new(vec![
            Series::new("Origin", strs(self, |r| r.origin.as_str())),
            Series::new("Destination", strs(self, |r| r.destination.as_str())),
            Series::new("Train_Type", strs(self, |r| r.train_type.label())),
            Series::new("Number_of_Cars", values(self, |r| r.number_of_cars)),
            Series::new("Number_of_Containers", values(self, |r| r.number_of_containers)),
        ])?)
    }
}

impl ToDataFrame for [BalanceEntry] {
    fn to_dataframe(&self) -> PlannerResult<DataFrame> {
        let rows: Vec<DemandRecord> = self.iter().map(DemandRecord::from).collect();
        rows.to_dataframe()
    }
}

impl ToDataFrame for [HourlyDemandRecord] {
    fn to_dataframe(&self) -> PlannerResult<DataFrame> {
        Ok(DataFrame::new(vec![
            Series::new("Origin", strs(self, |r| r.origin.as_str())),
            Series::new("Destination", strs(self, |r| r.destination.as_str())),
            Series::new("Train_Type", strs(self, |r| r.train_type.label())),
            Series::new("Hour", values(self, |r| r.hour)),
            Series::new("Number_of_Cars", values(self, |r| r.number_of_cars)),
            Series::new("Number_of_Containers", values(self, |r| r.number_of_containers)),
        ])?)
    }
}

impl ToDataFrame for [TrainDemandRecord] {
    fn to_dataframe(&self) -> PlannerResult<DataFrame> {
        Ok(DataFrame::new(vec![
            Series::new("Origin", strs(self, |r| r.origin.as_str())),
            Series::new("Destination", strs(self, |r| r.destination.as_str())),
            Series::new("Train_Type", strs(self, |r| r.train_type.label())),
            Series::new("Number_of_Cars", values(self, |r| r.number_of_cars)),
            Series::new("Number_of_Cars_Loaded", values(self, |r| r.number_of_cars_loaded)),
            Series::new("Number_of_Cars_Empty", values(self, |r| r.number_of_cars_empty)),
            Series::new("Tons_Per_Car_Loaded", values(self, |r| r.tons_per_car_loaded)),
            Series::new("Tons_Per_Car_Empty", values(self, |r| r.tons_per_car_empty)),
            Series::new(
                "HP_Required_Per_Ton_Loaded",
                values(self, |r| r.hp_required_per_ton_loaded),
            ),
            Series::new(
                "HP_Required_Per_Ton_Empty",
                values(self, |r| r.hp_required_per_ton_empty),
            ),
            Series::new("Cars_Per_Train_Min", values(self, |r| r.cars_per_train_min)),
            Series::new("Cars_Per_Train_Target", values(self, |r| r.cars_per_train_target)),
            Series::new("Number_of_Trains", values(self, |r| r.number_of_trains)),
            Series::new(
                "Number_of_Containers_Loaded",
                values(self, |r| r.number_of_containers_loaded),
            ),
            Series::new(
                "Number_of_Containers_Empty",
                values(self, |r| r.number_of_containers_empty),
            ),
            Series::new("Number_of_Days", values(self, |r| r.number_of_days)),
        ])?)
    }
}

impl ToDataFrame for [LocomotiveRecord] {
    fn to_dataframe(&self) -> PlannerResult<DataFrame> {
        Ok(DataFrame::new(vec![
            Series::new("Locomotive_ID", values(self, |l| l.locomotive_id)),
            Series::new("Locomotive_Type", strs(self, |l| l.locomotive_type.as_str())),
            Series::new("Node", strs(self, |l| l.node.as_str())),
            Series::new("Arrival_Time", values(self, |l| l.arrival_time)),
            Series::new("Servicing_Done_Time", values(self, |l| l.servicing_done_time)),
            Series::new("Refueling_Done_Time", values(self, |l| l.refueling_done_time)),
            Series::new("Status", labels(self, |l| l.status.to_string())),
            Series::new("SOC_Target_J", values(self, |l| l.soc_target_j)),
            Series::new("Refuel_Duration", values(self, |l| l.refuel_duration)),
            Series::new("Refueler_J_Per_Hr", values(self, |l| l.refueler_j_per_hr)),
            Series::new("Refueler_Efficiency", values(self, |l| l.refueler_efficiency)),
            Series::new("Port_Count", values(self, |l| l.port_count)),
            Series::new("Fuel_Type", labels(self, |l| l.fuel_type.to_string())),
            Series::new("HP", values(self, |l| l.hp)),
            Series::new("Loco_Mass_Tons", values(self, |l| l.loco_mass_tons)),
            Series::new("SOC_J", values(self, |l| l.soc_j)),
            Series::new("SOC_Min_J", values(self, |l| l.soc_min_j)),
            Series::new("SOC_Max_J", values(self, |l| l.soc_max_j)),
            Series::new("Capacity_J", values(self, |l| l.capacity_j)),
            Series::new("Battery_Headroom_J", values(self, |l| l.battery_headroom_j)),
        ])?)
    }
}

impl ToDataFrame for [RefuelerRecord] {
    fn to_dataframe(&self) -> PlannerResult<DataFrame> {
        Ok(DataFrame::new(vec![
            Series::new("Node", strs(self, |r| r.node.as_str())),
            Series::new("Refueler_Type", strs(self, |r| r.refueler_type.as_str())),
            Series::new("Locomotive_Type", strs(self, |r| r.locomotive_type.as_str())),
            Series::new("Fuel_Type", labels(self, |r| r.fuel_type.to_string())),
            Series::new("Refueler_J_Per_Hr", values(self, |r| r.refueler_j_per_hr)),
            Series::new("Refueler_Efficiency", values(self, |r| r.refueler_efficiency)),
            Series::new("Lifespan_Years", values(self, |r| r.lifespan_years)),
            Series::new("Cost_USD", values(self, |r| r.cost_usd)),
            Series::new("Port_Count", values(self, |r| r.port_count)),
            Series::new("Battery_Headroom_J", values(self, |r| r.battery_headroom_j)),
        ])?)
    }
}
