//! Nested read models assembled from flat rows.
//!
//! Nothing here is stored. A [`ProvinceNode`] is built by fetching each level
//! eagerly and grouping children under their parent code.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::area::{District, Province, Regency, Village};

// ─── Tree ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceNode {
  pub code:      String,
  pub name:      String,
  pub regencies: Vec<RegencyNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegencyNode {
  pub code:          String,
  pub province_code: String,
  pub name:          String,
  pub districts:     Vec<DistrictNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictNode {
  pub code:         String,
  pub regency_code: String,
  pub name:         String,
  /// `None` when villages were not requested.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub villages:     Option<Vec<Village>>,
}

/// Group flat rows into a tree rooted at `province`.
///
/// Children keep the order they arrive in; rows whose parent is absent from
/// the level above are dropped. `villages = None` leaves every
/// [`DistrictNode::villages`] unset.
pub fn assemble(
  province:  Province,
  regencies: Vec<Regency>,
  districts: Vec<District>,
  villages:  Option<Vec<Village>>,
) -> ProvinceNode {
  let mut villages_by_district: Option<HashMap<String, Vec<Village>>> =
    villages.map(|vs| {
      let mut map: HashMap<String, Vec<Village>> = HashMap::new();
      for v in vs {
        map.entry(v.district_code.clone()).or_default().push(v);
      }
      map
    });

  let mut districts_by_regency: HashMap<String, Vec<DistrictNode>> =
    HashMap::new();
  for d in districts {
    let villages = villages_by_district
      .as_mut()
      .map(|map| map.remove(&d.code).unwrap_or_default());
    districts_by_regency
      .entry(d.regency_code.clone())
      .or_default()
      .push(DistrictNode {
        code: d.code,
        regency_code: d.regency_code,
        name: d.name,
        villages,
      });
  }

  let regencies = regencies
    .into_iter()
    .filter(|r| r.province_code == province.code)
    .map(|r| RegencyNode {
      districts:     districts_by_regency.remove(&r.code).unwrap_or_default(),
      code:          r.code,
      province_code: r.province_code,
      name:          r.name,
    })
    .collect();

  ProvinceNode { code: province.code, name: province.name, regencies }
}

// ─── Ancestry ────────────────────────────────────────────────────────────────

/// An area together with every ancestor above it.
///
/// The deepest populated field is the area that was looked up. An ancestor
/// is `None` when its row is absent, which only happens when foreign keys
/// were off during the seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineage {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub province: Option<Province>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub regency:  Option<Regency>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub district: Option<District>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub village:  Option<Village>,
}

// ─── Statistics ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
  pub provinces:               u64,
  pub regencies:               u64,
  pub districts:               u64,
  pub villages:                u64,
  pub islands:                 u64,
  pub outermost_small_islands: u64,
  pub populated_islands:       u64,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn province() -> Province {
    Province { code: "32".into(), name: "JAWA BARAT".into() }
  }

  fn regency(code: &str, name: &str) -> Regency {
    Regency { code: code.into(), province_code: "32".into(), name: name.into() }
  }

  fn district(code: &str, regency_code: &str) -> District {
    District {
      code:         code.into(),
      regency_code: regency_code.into(),
      name:         format!("D {code}"),
    }
  }

  fn village(code: &str, district_code: &str) -> Village {
    Village {
      code:          code.into(),
      district_code: district_code.into(),
      name:          format!("V {code}"),
    }
  }

  #[test]
  fn groups_children_under_parents() {
    let tree = assemble(
      province(),
      vec![regency("32.04", "BANDUNG"), regency("32.01", "BOGOR")],
      vec![
        district("32.04.01", "32.04"),
        district("32.01.01", "32.01"),
        district("32.04.02", "32.04"),
      ],
      None,
    );

    assert_eq!(tree.code, "32");
    assert_eq!(tree.regencies.len(), 2);
    assert_eq!(tree.regencies[0].code, "32.04");
    let bandung: Vec<_> =
      tree.regencies[0].districts.iter().map(|d| d.code.as_str()).collect();
    assert_eq!(bandung, ["32.04.01", "32.04.02"]);
    assert!(
      tree
        .regencies
        .iter()
        .flat_map(|r| &r.districts)
        .all(|d| d.villages.is_none())
    );
  }

  #[test]
  fn villages_present_when_requested() {
    let tree = assemble(
      province(),
      vec![regency("32.04", "BANDUNG")],
      vec![district("32.04.01", "32.04"), district("32.04.02", "32.04")],
      Some(vec![
        village("32.04.01.2001", "32.04.01"),
        village("32.04.01.2002", "32.04.01"),
      ]),
    );

    let districts = &tree.regencies[0].districts;
    assert_eq!(districts[0].villages.as_ref().unwrap().len(), 2);
    // Requested but none exist: empty, not absent.
    assert_eq!(districts[1].villages.as_deref(), Some(&[][..]));
  }

  #[test]
  fn unset_villages_are_not_serialized() {
    let tree = assemble(
      province(),
      vec![regency("32.04", "BANDUNG")],
      vec![district("32.04.01", "32.04")],
      None,
    );
    let json = serde_json::to_value(&tree).unwrap();
    let d = &json["regencies"][0]["districts"][0];
    assert!(d.get("villages").is_none());
  }
}
