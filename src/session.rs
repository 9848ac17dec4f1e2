use chrono::{DateTime, Utc};
use log::info;
use thiserror::Error;

use crate::datetime;
use crate::trip::{Draft, TripRecord};

/// 運行記録の操作で利用者に提示するエラー。
#[derive(Debug, Error, Eq, PartialEq)]
pub enum TripError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("start the trip first")]
    NotStarted,
}

/// 運行開始前にどこまで入力を要求するかのポリシー。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StartPolicy {
    /// 全フィールドの入力を要求する。
    Full,
    /// オドメーターの入力のみ要求する。
    OdometerOnly,
}

/// 運行確定後にどのフィールドを残すかのポリシー。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResetPolicy {
    /// 全フィールドをクリアする。
    Full,
    /// ドライバーとトラックを残す。
    KeepVehicle,
    /// 配達先とオドメーター以外を残す。
    KeepSelections,
}

/// 1回の起動の間だけ保持する運行記録のセッション。
///
/// 入力途中のDraftと確定済みの記録一覧を持つ。確定済みの記録は新しいものが
/// 先頭になる。永続化は行わない。
pub struct TripSession {
    draft: Draft,
    records: Vec<TripRecord>,
    next_id: u64,
    start_policy: StartPolicy,
    reset_policy: ResetPolicy,
}

impl TripSession {
    /// 新しい`TripSession`を返す。
    ///
    /// # Arguments
    ///
    /// * `start_policy` - 運行開始前の入力チェックのポリシー
    /// * `reset_policy` - 運行確定後のフィールドクリアのポリシー
    pub fn new(start_policy: StartPolicy, reset_policy: ResetPolicy) -> Self {
        Self {
            draft: Draft::default(),
            records: Vec::new(),
            next_id: 1,
            start_policy,
            reset_policy,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// 確定済みの運行記録を新しい順で返す。
    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    /// 運行を開始し、開始時刻を返す。
    ///
    /// 入力チェックは`StartPolicy`に従う。すでに開始済みの場合は
    /// 開始時刻を現在時刻で上書きする。
    pub fn start_trip(&mut self) -> Result<DateTime<Utc>, TripError> {
        let missing = match self.start_policy {
            StartPolicy::Full => self.draft.first_missing_field(),
            StartPolicy::OdometerOnly => self
                .draft
                .odometer
                .trim()
                .is_empty()
                .then_some("Starting Odometer"),
        };
        if let Some(field) = missing {
            return Err(TripError::MissingField(field));
        }

        let started_at = datetime::now();
        self.draft.started_at = Some(started_at);
        info!("Trip started at {}", started_at);

        Ok(started_at)
    }

    /// 運行を終了し、確定した記録を返す。
    ///
    /// 開始していない場合はエラーを返す。確定前に全フィールドを再チェックし、
    /// 記録を一覧の先頭に追加した後、`ResetPolicy`に従ってDraftをクリアする。
    pub fn end_trip(&mut self) -> Result<TripRecord, TripError> {
        let started_at = self.draft.started_at.ok_or(TripError::NotStarted)?;
        if let Some(field) = self.draft.first_missing_field() {
            return Err(TripError::MissingField(field));
        }

        let record = TripRecord {
            id: self.next_id,
            driver: self.draft.driver.clone(),
            truck: self.draft.truck.clone(),
            customer: self.draft.customer.clone(),
            material: self.draft.material.clone(),
            pickup: self.draft.pickup.clone(),
            delivery: self.draft.delivery.clone(),
            odometer: self.draft.odometer.clone(),
            started_at,
            ended_at: datetime::now(),
        };
        self.next_id += 1;
        self.records.insert(0, record.clone());
        self.reset_draft();
        info!("Trip {} saved, {} records in store", record.id, self.records.len());

        Ok(record)
    }

    /// `ResetPolicy`に従ってDraftをクリアする。開始時刻は常にクリアする。
    fn reset_draft(&mut self) {
        match self.reset_policy {
            ResetPolicy::Full => self.draft = Draft::default(),
            ResetPolicy::KeepVehicle => {
                let driver = std::mem::take(&mut self.draft.driver);
                let truck = std::mem::take(&mut self.draft.truck);
                self.draft = Draft {
                    driver,
                    truck,
                    ..Draft::default()
                };
            }
            ResetPolicy::KeepSelections => {
                self.draft.delivery.clear();
                self.draft.odometer.clear();
                self.draft.started_at = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use super::ResetPolicy;
    use super::StartPolicy;
    use super::TripError;
    use super::TripSession;
    use crate::datetime::mock_datetime;
    use crate::trip::Draft;

    /// startの直後にendした場合に、記録が1件だけ先頭に追加されることを確認する。
    #[test]
    fn test_start_then_end_appends_one_record() {
        let mut session = full_session(StartPolicy::Full, ResetPolicy::Full);
        mock_datetime::set_mock_time(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap());

        let started_at = session.start_trip().unwrap();
        mock_datetime::set_mock_time(Utc.with_ymd_and_hms(2024, 5, 1, 10, 15, 0).unwrap());
        let record = session.end_trip().unwrap();

        assert_eq!(session.records().len(), 1);
        assert_eq!(record.id, 1);
        assert_eq!(record.driver, "Josh");
        assert_eq!(record.started_at, started_at);
        assert!(record.ended_at >= record.started_at);
        mock_datetime::clear_mock_time();
    }

    /// startせずにendした場合に、記録が追加されずエラーになることを確認する。
    #[test]
    fn test_end_without_start() {
        let mut session = full_session(StartPolicy::Full, ResetPolicy::Full);

        let result = session.end_trip();

        assert_eq!(result.unwrap_err(), TripError::NotStarted);
        assert!(session.records().is_empty());
    }

    /// 未入力フィールドがある場合に、startが確認順で最初のフィールド名を返すことを確認する。
    #[test]
    fn test_start_with_missing_field() {
        let mut session = full_session(StartPolicy::Full, ResetPolicy::Full);
        session.draft_mut().driver.clear();
        session.draft_mut().pickup.clear();

        let result = session.start_trip();

        assert_eq!(result.unwrap_err(), TripError::MissingField("Driver"));
        assert!(session.draft().started_at.is_none());
    }

    /// オドメーターのみのポリシーでは、他のフィールドが未入力でもstartできることを確認する。
    #[test]
    fn test_start_with_odometer_only_policy() {
        let mut session = TripSession::new(StartPolicy::OdometerOnly, ResetPolicy::Full);
        session.draft_mut().set_odometer("100200");

        assert!(session.start_trip().is_ok());
    }

    /// オドメーターのみのポリシーでも、オドメーターが未入力ならstartできないことを確認する。
    #[test]
    fn test_start_with_odometer_only_policy_missing_odometer() {
        let mut session = TripSession::new(StartPolicy::OdometerOnly, ResetPolicy::Full);
        session.draft_mut().driver = "Josh".to_string();

        let result = session.start_trip();

        assert_eq!(
            result.unwrap_err(),
            TripError::MissingField("Starting Odometer")
        );
    }

    /// 開始済みのまま再度startした場合に、開始時刻が上書きされることを確認する。
    #[test]
    fn test_start_twice_overwrites_started_at() {
        let mut session = full_session(StartPolicy::Full, ResetPolicy::Full);
        mock_datetime::set_mock_time(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
        session.start_trip().unwrap();

        mock_datetime::set_mock_time(Utc.with_ymd_and_hms(2024, 5, 1, 9, 5, 0).unwrap());
        session.start_trip().unwrap();

        assert_eq!(
            session.draft().started_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 5, 0).unwrap())
        );
        mock_datetime::clear_mock_time();
    }

    /// 複数の運行を確定した場合に、新しい記録が先頭に来てIDが再利用されないことを確認する。
    #[test]
    fn test_records_newest_first_with_fresh_ids() {
        let mut session = full_session(StartPolicy::Full, ResetPolicy::KeepSelections);
        session.start_trip().unwrap();
        session.end_trip().unwrap();

        session.draft_mut().set_delivery("456 Oak Ave");
        session.draft_mut().set_odometer("100250");
        session.start_trip().unwrap();
        session.end_trip().unwrap();

        assert_eq!(session.records().len(), 2);
        assert_eq!(session.records()[0].id, 2);
        assert_eq!(session.records()[0].delivery, "456 Oak Ave");
        assert_eq!(session.records()[1].id, 1);
    }

    /// 確定後にポリシーごとの期待したフィールドだけが残ることを確認する。
    #[rstest]
    #[case::full(ResetPolicy::Full, "", "", "")]
    #[case::keep_vehicle(ResetPolicy::KeepVehicle, "Josh", "", "")]
    #[case::keep_selections(ResetPolicy::KeepSelections, "Josh", "CCC", "Quarry A")]
    fn test_reset_policy(
        #[case] policy: ResetPolicy,
        #[case] driver: &str,
        #[case] customer: &str,
        #[case] pickup: &str,
    ) {
        let mut session = full_session(StartPolicy::Full, policy);
        session.start_trip().unwrap();
        session.end_trip().unwrap();

        let draft = session.draft();
        assert_eq!(draft.driver, driver);
        assert_eq!(draft.customer, customer);
        assert_eq!(draft.pickup, pickup);
        assert_eq!(draft.delivery, "");
        assert_eq!(draft.odometer, "");
        assert!(draft.started_at.is_none());
    }

    /// テスト用に全フィールドが入力済みのセッションを作成する。
    fn full_session(start_policy: StartPolicy, reset_policy: ResetPolicy) -> TripSession {
        let mut session = TripSession::new(start_policy, reset_policy);
        *session.draft_mut() = Draft {
            driver: "Josh".to_string(),
            truck: "2010 International".to_string(),
            customer: "CCC".to_string(),
            material: "rock".to_string(),
            pickup: "Quarry A".to_string(),
            delivery: "123 Main St".to_string(),
            odometer: "100200".to_string(),
            started_at: None,
        };
        session
    }
}
