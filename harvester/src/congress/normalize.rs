//! Flattening one bill into action and sponsorship records.

use serde_json::Value;

use super::extract::{
    as_object, count, district, extract_bill, invalid_type, is_present, optional_str, parse_date,
    parse_timestamp, required_object, required_str, BillDocument, BillView, ExtractError,
};
use super::types::{ActionRecord, BillKey, BillRecord, SponsorRole, SponsorshipRecord, INTRODUCED};

type Object = serde_json::Map<String, Value>;

/// Everything produced from one successfully parsed bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBill {
    pub bill: BillRecord,
    pub actions: Vec<ActionRecord>,
    pub sponsorships: Vec<SponsorshipRecord>,
}

impl BillDocument {
    /// Extract the bill record and flatten its actions and sponsorships.
    ///
    /// # Errors
    /// Returns the first [`ExtractError`] hit; no partial output is produced.
    pub fn normalize(&self, key: &BillKey) -> Result<NormalizedBill, ExtractError> {
        let view = self.view()?;
        let bill = extract_bill(&view, key)?;
        let actions = actions(&view, key)?;
        let sponsorships = sponsorships(&view, &bill)?;

        Ok(NormalizedBill {
            bill,
            actions,
            sponsorships,
        })
    }
}

fn list<'a>(obj: &'a Object, field: &str) -> Result<&'a [Value], ExtractError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(&[][..]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(invalid_type(field, "an array")),
    }
}

/// Actions oldest first, the first relabelled as the introduction.
///
/// GovTrack lists actions in occurrence order. ProPublica lists them newest
/// first, so they are stably sorted by timestamp and then by action id.
/// A bill without actions yields no action records.
fn actions(view: &BillView<'_>, key: &BillKey) -> Result<Vec<ActionRecord>, ExtractError> {
    let (doc, timestamp_field, type_field, text_field) = match view {
        BillView::GovTrack(doc) => (*doc, "acted_at", "type", "text"),
        BillView::ProPublica { bill, .. } => (*bill, "datetime", "action_type", "description"),
    };
    let newest_first = matches!(view, BillView::ProPublica { .. });

    let mut actions = list(doc, "actions")?
        .iter()
        .map(|raw| -> Result<(u32, ActionRecord), ExtractError> {
            let action = as_object(raw, "actions[]")?;
            let (date, time) =
                parse_timestamp(timestamp_field, &required_str(action, timestamp_field)?)?;

            let record = ActionRecord {
                bill: *key,
                date,
                time,
                status: optional_str(action, "status")?,
                action_type: optional_str(action, type_field)?,
                committees: committees(action)?,
                text: optional_str(action, text_field)?,
            };
            let id = if newest_first { count(action, "id")? } else { 0 };
            Ok((id, record))
        })
        .collect::<Result<Vec<_>, ExtractError>>()?;

    if newest_first {
        actions.sort_by(|(a_id, a), (b_id, b)| {
            (a.date, a.time, a_id).cmp(&(b.date, b.time, b_id))
        });
    }

    let mut actions: Vec<ActionRecord> = actions.into_iter().map(|(_, record)| record).collect();
    if let Some(first) = actions.first_mut() {
        first.status = INTRODUCED.to_string();
    }

    Ok(actions)
}

fn committees(action: &Object) -> Result<Option<String>, ExtractError> {
    if !is_present(action, "committees") {
        return Ok(None);
    }

    let names = list(action, "committees")?
        .iter()
        .map(|c| {
            c.as_str()
                .ok_or_else(|| invalid_type("committees[]", "a string"))
        })
        .collect::<Result<Vec<_>, ExtractError>>()?;
    Ok(Some(names.join("|")))
}

/// Only an explicit `true` marks an original cosponsor.
fn cosponsor_role(cosponsor: &Object) -> SponsorRole {
    match cosponsor.get("original_cosponsor") {
        Some(Value::Bool(true)) => SponsorRole::OriginalCosponsor,
        _ => SponsorRole::Cosponsor,
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// The sponsor first, then every cosponsor in source order.
fn sponsorships(
    view: &BillView<'_>,
    bill: &BillRecord,
) -> Result<Vec<SponsorshipRecord>, ExtractError> {
    match view {
        BillView::GovTrack(doc) => govtrack_sponsorships(doc, bill),
        BillView::ProPublica { bill: raw, cosponsors } => {
            propublica_sponsorships(raw, cosponsors, bill)
        }
    }
}

fn govtrack_sponsorships(
    doc: &Object,
    bill: &BillRecord,
) -> Result<Vec<SponsorshipRecord>, ExtractError> {
    let sponsor = required_object(doc, "sponsor")?;
    let mut records = vec![SponsorshipRecord {
        bill: bill.key,
        role: SponsorRole::Sponsor,
        name: required_str(sponsor, "name")?,
        title: optional_str(sponsor, "title")?,
        state: optional_str(sponsor, "state")?,
        district: district(sponsor, "district")?,
        joined_at: bill.introduced,
        bioguide_id: non_empty(optional_str(sponsor, "bioguide_id")?),
    }];

    for raw in list(doc, "cosponsors")? {
        let cosponsor = as_object(raw, "cosponsors[]")?;
        records.push(SponsorshipRecord {
            bill: bill.key,
            role: cosponsor_role(cosponsor),
            name: required_str(cosponsor, "name")?,
            title: optional_str(cosponsor, "title")?,
            state: optional_str(cosponsor, "state")?,
            district: district(cosponsor, "district")?,
            joined_at: parse_date("sponsored_at", &required_str(cosponsor, "sponsored_at")?)?,
            bioguide_id: non_empty(optional_str(cosponsor, "bioguide_id")?),
        });
    }

    Ok(records)
}

fn propublica_sponsorships(
    raw: &Object,
    cosponsors: &Object,
    bill: &BillRecord,
) -> Result<Vec<SponsorshipRecord>, ExtractError> {
    let mut records = vec![SponsorshipRecord {
        bill: bill.key,
        role: SponsorRole::Sponsor,
        name: required_str(raw, "sponsor")?,
        title: optional_str(raw, "sponsor_title")?,
        state: optional_str(raw, "sponsor_state")?,
        district: district(raw, "sponsor_district")?,
        joined_at: bill.introduced,
        bioguide_id: non_empty(optional_str(raw, "sponsor_id")?),
    }];

    for raw in list(cosponsors, "cosponsors")? {
        let cosponsor = as_object(raw, "cosponsors[]")?;
        records.push(SponsorshipRecord {
            bill: bill.key,
            role: cosponsor_role(cosponsor),
            name: required_str(cosponsor, "name")?,
            title: optional_str(cosponsor, "cosponsor_title")?,
            state: optional_str(cosponsor, "cosponsor_state")?,
            district: district(cosponsor, "cosponsor_district")?,
            joined_at: parse_date("date", &required_str(cosponsor, "date")?)?,
            bioguide_id: non_empty(optional_str(cosponsor, "cosponsor_id")?),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::congress::types::BillType;
    use chrono::NaiveDate;
    use serde_json::json;

    fn key() -> BillKey {
        BillKey::new(BillType::Hr, 5, 114)
    }

    fn cosponsor(name: &str, original: Value, district: Value) -> Value {
        json!({
            "name": name,
            "title": "Rep",
            "state": "NY",
            "district": district,
            "bioguide_id": "X000001",
            "original_cosponsor": original,
            "sponsored_at": "2015-01-07"
        })
    }

    fn govtrack(cosponsors: Vec<Value>, actions: Vec<Value>) -> BillDocument {
        BillDocument::GovTrack(json!({
            "introduced_at": "2015-01-06",
            "status": "REFERRED",
            "sponsor": {
                "name": "Young, Don",
                "title": "Rep",
                "state": "AK",
                "district": null,
                "bioguide_id": "Y000033"
            },
            "cosponsors": cosponsors,
            "actions": actions
        }))
    }

    fn action(acted_at: &str, status: Option<&str>) -> Value {
        let mut action = json!({
            "acted_at": acted_at,
            "type": "referral",
            "text": "Referred to the House Committee on Natural Resources.",
            "committees": ["HSII", "HSAG"]
        });
        if let Some(status) = status {
            action["status"] = json!(status);
        }
        action
    }

    #[test]
    fn empty_cosponsor_list_yields_only_sponsor() {
        let out = govtrack(vec![], vec![]).normalize(&key()).unwrap();

        assert_eq!(out.sponsorships.len(), 1);
        assert_eq!(out.sponsorships[0].role, SponsorRole::Sponsor);
        assert_eq!(out.sponsorships[0].name, "Young, Don");
    }

    #[test]
    fn sponsor_comes_first_then_cosponsors_in_order() {
        let cosponsors = vec![
            cosponsor("A, One", json!(true), json!(1)),
            cosponsor("B, Two", json!(false), json!(2)),
            cosponsor("C, Three", json!(true), json!(3)),
        ];
        let out = govtrack(cosponsors, vec![]).normalize(&key()).unwrap();

        let names: Vec<_> = out.sponsorships.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Young, Don", "A, One", "B, Two", "C, Three"]);
        assert!(out.sponsorships.iter().all(|s| s.bill == key()));
    }

    #[test]
    fn original_cosponsor_requires_explicit_true() {
        let cases = [
            (json!(true), SponsorRole::OriginalCosponsor),
            (json!(false), SponsorRole::Cosponsor),
            (Value::Null, SponsorRole::Cosponsor),
            (json!("true"), SponsorRole::Cosponsor),
            (json!(1), SponsorRole::Cosponsor),
        ];

        for (flag, expected) in cases {
            let out = govtrack(vec![cosponsor("A, One", flag.clone(), json!(1))], vec![])
                .normalize(&key())
                .unwrap();
            assert_eq!(out.sponsorships[1].role, expected, "flag {flag}");
        }
    }

    #[test]
    fn missing_original_flag_is_plain_cosponsor() {
        let mut c = cosponsor("A, One", json!(true), json!(1));
        c.as_object_mut().unwrap().remove("original_cosponsor");
        let out = govtrack(vec![c], vec![]).normalize(&key()).unwrap();
        assert_eq!(out.sponsorships[1].role, SponsorRole::Cosponsor);
    }

    #[test]
    fn null_district_becomes_zero_for_sponsor_and_cosponsor() {
        let out = govtrack(vec![cosponsor("A, One", json!(false), Value::Null)], vec![])
            .normalize(&key())
            .unwrap();

        assert_eq!(out.sponsorships[0].district, 0);
        assert_eq!(out.sponsorships[1].district, 0);
    }

    #[test]
    fn sponsor_joins_on_introduction_and_cosponsor_on_sponsored_at() {
        let out = govtrack(vec![cosponsor("A, One", json!(false), json!(4))], vec![])
            .normalize(&key())
            .unwrap();

        assert_eq!(
            out.sponsorships[0].joined_at,
            NaiveDate::from_ymd_opt(2015, 1, 6).unwrap()
        );
        assert_eq!(
            out.sponsorships[1].joined_at,
            NaiveDate::from_ymd_opt(2015, 1, 7).unwrap()
        );
        assert_eq!(out.sponsorships[0].bioguide_id.as_deref(), Some("Y000033"));
    }

    #[test]
    fn first_action_is_always_introduced() {
        let cases = [Some("REFERRED"), Some("PASS_OVER:HOUSE"), None];

        for status in cases {
            let actions = vec![
                action("2015-01-06", status),
                action("2015-01-07T10:15:00-05:00", Some("REFERRED")),
            ];
            let out = govtrack(vec![], actions).normalize(&key()).unwrap();

            assert_eq!(out.actions[0].status, INTRODUCED, "status {status:?}");
            assert_eq!(out.actions[1].status, "REFERRED");
        }
    }

    #[test]
    fn action_fields_are_flattened() {
        let out = govtrack(vec![], vec![action("2015-01-07T10:15:00-05:00", None)])
            .normalize(&key())
            .unwrap();
        let first = &out.actions[0];

        assert_eq!(first.bill, key());
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2015, 1, 7).unwrap());
        assert!(first.time.is_some());
        assert_eq!(first.action_type, "referral");
        assert_eq!(first.committees.as_deref(), Some("HSII|HSAG"));
    }

    #[test]
    fn empty_action_list_yields_no_actions() {
        let out = govtrack(vec![], vec![]).normalize(&key()).unwrap();
        assert!(out.actions.is_empty());
        assert_eq!(out.bill.key, key());
    }

    #[test]
    fn malformed_cosponsor_date_fails_whole_bill() {
        let mut c = cosponsor("A, One", json!(false), json!(1));
        c["sponsored_at"] = json!("yesterday");
        let err = govtrack(vec![c], vec![]).normalize(&key()).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidDate { .. }));
    }

    #[test]
    fn propublica_sponsorships_and_actions() {
        let doc = BillDocument::ProPublica {
            bill: json!({
                "status": "OK",
                "results": [{
                    "sponsor": "Darrell Issa",
                    "sponsor_id": "I000056",
                    "sponsor_title": "Rep.",
                    "sponsor_state": "CA",
                    "introduced_date": "2017-01-03",
                    "actions": [
                        {"datetime": "2017-01-04", "action_type": "Floor", "description": "Passed"},
                        {"datetime": "2017-01-03", "action_type": "IntroReferral", "description": "Referred"}
                    ]
                }]
            }),
            cosponsors: json!({
                "status": "OK",
                "results": [{
                    "cosponsors": [
                        {"cosponsor_id": "G000559", "name": "John Garamendi", "cosponsor_title": "Rep.",
                         "cosponsor_state": "CA", "date": "2017-01-03"}
                    ]
                }]
            }),
        };

        let out = doc.normalize(&key()).unwrap();

        assert_eq!(out.actions.len(), 2);
        assert_eq!(out.actions[0].status, INTRODUCED);
        assert_eq!(out.actions[0].text, "Referred");
        assert_eq!(out.actions[1].status, "");
        assert_eq!(out.actions[1].text, "Passed");
        assert!(out.actions[1].committees.is_none());

        assert_eq!(out.sponsorships.len(), 2);
        assert_eq!(out.sponsorships[0].role, SponsorRole::Sponsor);
        assert_eq!(out.sponsorships[0].state, "CA");
        assert_eq!(out.sponsorships[0].district, 0);
        assert_eq!(out.sponsorships[1].role, SponsorRole::Cosponsor);
        assert_eq!(out.sponsorships[1].bioguide_id.as_deref(), Some("G000559"));
    }

    fn propublica_with_actions(actions: Value) -> BillDocument {
        BillDocument::ProPublica {
            bill: json!({
                "status": "OK",
                "results": [{
                    "sponsor": "Darrell Issa",
                    "sponsor_state": "CA",
                    "introduced_date": "2017-01-03",
                    "actions": actions
                }]
            }),
            cosponsors: json!({ "status": "OK", "results": [{ "cosponsors": [] }] }),
        }
    }

    #[test]
    fn propublica_newest_first_actions_are_reordered() {
        let doc = propublica_with_actions(json!([
            {"id": 3, "datetime": "2017-01-04", "action_type": "Floor", "description": "On passage Passed"},
            {"id": 2, "datetime": "2017-01-03", "action_type": "IntroReferral", "description": "Referred to the Committee"},
            {"id": 1, "datetime": "2017-01-03", "action_type": "IntroReferral", "description": "Introduced in House"}
        ]));

        let out = doc.normalize(&key()).unwrap();

        let texts: Vec<_> = out.actions.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(
            texts,
            ["Introduced in House", "Referred to the Committee", "On passage Passed"]
        );
        assert_eq!(out.actions[0].status, INTRODUCED);
        assert_eq!(out.actions[0].date, NaiveDate::from_ymd_opt(2017, 1, 3).unwrap());
        assert_eq!(out.actions[2].status, "");
    }

    #[test]
    fn propublica_same_day_actions_order_by_time() {
        let doc = propublica_with_actions(json!([
            {"datetime": "2017-01-03T15:00:00-05:00", "description": "Referred"},
            {"datetime": "2017-01-03T09:30:00-05:00", "description": "Introduced"}
        ]));

        let out = doc.normalize(&key()).unwrap();

        assert_eq!(out.actions[0].text, "Introduced");
        assert_eq!(out.actions[0].status, INTRODUCED);
        assert_eq!(out.actions[1].text, "Referred");
    }

    #[test]
    fn govtrack_actions_keep_source_order() {
        let actions = vec![
            action("2015-01-07", Some("REFERRED")),
            action("2015-01-06", Some("PASS_OVER:HOUSE")),
        ];
        let out = govtrack(vec![], actions).normalize(&key()).unwrap();

        assert_eq!(out.actions[0].date, NaiveDate::from_ymd_opt(2015, 1, 7).unwrap());
        assert_eq!(out.actions[0].status, INTRODUCED);
    }
}
