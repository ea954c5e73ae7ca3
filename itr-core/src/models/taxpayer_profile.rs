use serde::{Deserialize, Serialize};

/// Age categories that change the basic exemption under the Old regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBand {
    /// Below 60.
    Regular,
    /// 60 to 79.
    Senior,
    /// 80 and above.
    SuperSenior,
}

impl AgeBand {
    pub fn from_age(age: u32) -> Self {
        match age {
            0..60 => Self::Regular,
            60..80 => Self::Senior,
            _ => Self::SuperSenior,
        }
    }
}

/// Taxpayer attributes the slab engine depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxpayerProfile {
    pub age: u32,
    pub is_resident: bool,
}

impl TaxpayerProfile {
    pub fn new(
        age: u32,
        is_resident: bool,
    ) -> Self {
        Self { age, is_resident }
    }

    pub fn age_band(&self) -> AgeBand {
        AgeBand::from_age(self.age)
    }
}
