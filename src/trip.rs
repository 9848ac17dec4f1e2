use chrono::{DateTime, Utc};

use crate::catalog::ChoiceField;

/// 確定済みの運行記録。一度storeに追加した後は変更しない。
#[derive(Clone, Debug)]
pub struct TripRecord {
    pub id: u64,
    pub driver: String,
    pub truck: String,
    pub customer: String,
    pub material: String,
    pub pickup: String,
    pub delivery: String,
    pub odometer: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// 入力途中の運行記録。空文字列は未入力を表す。
#[derive(Clone, Debug, Default)]
pub struct Draft {
    pub driver: String,
    pub truck: String,
    pub customer: String,
    pub material: String,
    pub pickup: String,
    pub delivery: String,
    pub odometer: String,
    pub started_at: Option<DateTime<Utc>>,
}

impl Draft {
    /// 選択式フィールドに選択肢から選んだ値を設定する。
    pub fn set_choice(&mut self, field: ChoiceField, value: String) {
        match field {
            ChoiceField::Driver => self.driver = value,
            ChoiceField::Truck => self.truck = value,
            ChoiceField::Customer => self.customer = value,
            ChoiceField::Material => self.material = value,
            ChoiceField::Pickup => self.pickup = value,
        }
    }

    /// 配達先を設定する。前後の空白は取り除く。
    pub fn set_delivery(&mut self, value: &str) {
        self.delivery = value.trim().to_string();
    }

    /// 開始時のオドメーターを設定する。前後の空白は取り除く。
    ///
    /// 数値としての解釈は行わず、文字列のまま保持する。
    pub fn set_odometer(&mut self, value: &str) {
        self.odometer = value.trim().to_string();
    }

    /// 未入力のフィールドのうち、固定の確認順で最初のものの表示名を返す。
    ///
    /// 全フィールドが入力済みの場合は`None`を返す。
    /// 自由入力のフィールドは空白のみの場合も未入力として扱う。
    pub fn first_missing_field(&self) -> Option<&'static str> {
        if self.driver.is_empty() {
            return Some("Driver");
        }
        if self.truck.is_empty() {
            return Some("Truck");
        }
        if self.odometer.trim().is_empty() {
            return Some("Starting Odometer");
        }
        if self.pickup.is_empty() {
            return Some("Pickup");
        }
        if self.delivery.trim().is_empty() {
            return Some("Delivery");
        }
        if self.material.is_empty() {
            return Some("Material");
        }
        if self.customer.is_empty() {
            return Some("Customer");
        }

        None
    }
}
