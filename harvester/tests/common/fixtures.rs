//! Raw documents shaped like each catalog's responses.

use serde_json::{json, Value};

/// GovTrack `data.json` for an HR bill with one sponsor, one original
/// cosponsor and two actions.
pub fn govtrack_bill(number: u32) -> Value {
    json!({
        "bill_type": "hr",
        "number": number.to_string(),
        "congress": "114",
        "short_title": format!("Short title {number}"),
        "official_title": format!("To amend something, number {number}."),
        "popular_title": null,
        "status": "PASSED:BILL",
        "status_at": "2015-02-02T18:51:00-05:00",
        "introduced_at": "2015-01-06",
        "subjects_top_term": "Government operations and politics",
        "enacted_as": null,
        "history": {
            "house_passage_result": "pass",
            "senate_passage_result": null,
            "enacted": false,
            "vetoed": false
        },
        "sponsor": {
            "name": "Issa, Darrell E.",
            "title": "Rep",
            "state": "CA",
            "district": "49",
            "bioguide_id": "I000056"
        },
        "cosponsors": [
            {
                "name": "Young, Don",
                "title": "Rep",
                "state": "AK",
                "district": null,
                "sponsored_at": "2015-01-06",
                "original_cosponsor": true,
                "bioguide_id": "Y000033"
            }
        ],
        "actions": [
            {
                "acted_at": "2015-01-06",
                "type": "action",
                "status": "REFERRED",
                "text": "Introduced in House",
                "committees": ["HSGO"]
            },
            {
                "acted_at": "2015-02-02T18:51:00-05:00",
                "type": "vote",
                "status": "PASS_OVER:HOUSE",
                "text": "On passage Passed by voice vote."
            }
        ]
    })
}

/// ProPublica bill envelope with a single result. Actions are listed newest
/// first, as the API does.
pub fn propublica_bill(slug: &str) -> Value {
    json!({
        "status": "OK",
        "copyright": "Copyright (c) 2017 Pro Publica Inc. All Rights Reserved.",
        "results": [{
            "bill_id": format!("{slug}-115"),
            "bill_slug": slug,
            "title": "To reform the budget process.",
            "short_title": "Budget Reform Act",
            "popular_title": "",
            "sponsor": "Tom Reed",
            "sponsor_id": "R000585",
            "sponsor_title": "Rep.",
            "sponsor_state": "NY",
            "sponsor_district": "23",
            "introduced_date": "2017-01-03",
            "house_passage": null,
            "senate_passage": null,
            "enacted": null,
            "vetoed": null,
            "cosponsors": 1,
            "cosponsors_by_party": { "D": 1 },
            "primary_subject": "Economics and Public Finance",
            "latest_major_action": "Referred to the House Committee on the Budget.",
            "latest_major_action_date": "2017-01-04",
            "actions": [
                {
                    "id": 2,
                    "chamber": "House",
                    "action_type": "IntroReferral",
                    "datetime": "2017-01-04",
                    "description": "Referred to the House Committee on the Budget."
                },
                {
                    "id": 1,
                    "chamber": "House",
                    "action_type": "IntroReferral",
                    "datetime": "2017-01-03",
                    "description": "Introduced in House"
                }
            ]
        }]
    })
}

/// ProPublica cosponsor envelope with a single cosponsor.
pub fn propublica_cosponsors() -> Value {
    json!({
        "status": "OK",
        "results": [{
            "cosponsors": [
                {
                    "cosponsor_id": "S001145",
                    "name": "Jan Schakowsky",
                    "cosponsor_title": "Rep.",
                    "cosponsor_state": "IL",
                    "cosponsor_district": "9",
                    "date": "2017-01-05"
                }
            ]
        }]
    })
}

/// EveryPolitician term CSV covering the GovTrack fixture's sponsors.
pub const ROSTER_CSV: &str = "\
id,name,sort_name,email,twitter,facebook,group,group_id,area_id,area,chamber,term
a1,Darrell Issa,\"Issa, Darrell\",,DarrellIssa,darrellissa,Republican,republican,ocd-division/country:us/state:ca/cd:49,California 49,House,114
b2,Don Young,\"Young, Don\",,repdonyoung,,Republican,republican,ocd-division/country:us/state:ak,Alaska,House,114
";

/// EveryPolitician term CSV covering the ProPublica fixture's sponsors.
pub const PROPUBLICA_ROSTER_CSV: &str = "\
id,name,sort_name,email,twitter,facebook,group,group_id,area_id,area,chamber,term
c3,Tom Reed,\"Reed, Tom\",,RepTomReed,,Republican,republican,ocd-division/country:us/state:ny/cd:23,New York 23,House,115
d4,Jan Schakowsky,\"Schakowsky, Jan\",,janschakowsky,,Democrat,democrat,ocd-division/country:us/state:il/cd:9,Illinois 9,House,115
";
