//! Shop onboarding: phone → profile → node assignment → complete

use kirana_core::NodeInfo;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Simulator;
use crate::error::{Result, SimError};

/// Minimum digits in a phone number
const MIN_PHONE_DIGITS: usize = 10;

/// Where a shop is in the onboarding flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OnboardingStep {
    Phone,
    Profile,
    Assignment,
    Complete,
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OnboardingStep::Phone => "phone",
            OnboardingStep::Profile => "profile",
            OnboardingStep::Assignment => "assignment",
            OnboardingStep::Complete => "complete",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopProfile {
    pub name: String,
    pub location: String,
}

/// Result of a finished onboarding flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardedShop {
    pub phone: String,
    pub profile: ShopProfile,
    pub node: NodeInfo,
}

/// One pass through onboarding against a simulator
///
/// Steps must be taken in order; the node is assigned once, when the
/// profile is submitted, and is not persisted anywhere else.
pub struct OnboardingFlow<'a> {
    simulator: &'a Simulator,
    step: OnboardingStep,
    phone: Option<String>,
    profile: Option<ShopProfile>,
    node: Option<NodeInfo>,
}

impl<'a> OnboardingFlow<'a> {
    pub fn new(simulator: &'a Simulator) -> Self {
        Self {
            simulator,
            step: OnboardingStep::Phone,
            phone: None,
            profile: None,
            node: None,
        }
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn node(&self) -> Option<&NodeInfo> {
        self.node.as_ref()
    }

    /// Verify the shop's phone number
    ///
    /// Spaces, dashes, parentheses and a leading '+' are allowed as
    /// separators; anything else is rejected.
    pub async fn verify_phone(&mut self, number: &str) -> Result<()> {
        self.expect(OnboardingStep::Phone)?;

        let number = number.trim();
        let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '+');
        let digits = number.chars().filter(char::is_ascii_digit).count();
        if !number.chars().all(allowed) || digits < MIN_PHONE_DIGITS {
            return Err(SimError::InvalidPhoneNumber(number.to_string()));
        }

        self.simulator
            .delay(self.simulator.config().phone_verification_latency())
            .await;
        info!("Phone {} verified", number);
        self.phone = Some(number.to_string());
        self.step = OnboardingStep::Profile;
        Ok(())
    }

    /// Submit the shop profile and receive a node assignment
    pub async fn submit_profile(&mut self, name: &str, location: &str) -> Result<&NodeInfo> {
        self.expect(OnboardingStep::Profile)?;

        if name.trim().is_empty() {
            return Err(SimError::IncompleteProfile("shop name is required".to_string()));
        }
        if location.trim().is_empty() {
            return Err(SimError::IncompleteProfile("location is required".to_string()));
        }

        let node = self.simulator.node_assignment().await?;
        self.profile = Some(ShopProfile {
            name: name.trim().to_string(),
            location: location.trim().to_string(),
        });
        self.step = OnboardingStep::Assignment;
        Ok(&*self.node.insert(node))
    }

    /// Confirm the assignment and finish
    pub fn complete(&mut self) -> Result<OnboardedShop> {
        self.expect(OnboardingStep::Assignment)?;

        let (Some(phone), Some(profile), Some(node)) =
            (self.phone.clone(), self.profile.clone(), self.node.clone())
        else {
            return Err(SimError::OnboardingStep {
                expected: OnboardingStep::Assignment,
                actual: self.step,
            });
        };

        self.step = OnboardingStep::Complete;
        info!("{} onboarded onto {}", profile.name, node.name);
        Ok(OnboardedShop {
            phone,
            profile,
            node,
        })
    }

    fn expect(&self, expected: OnboardingStep) -> Result<()> {
        if self.step == expected {
            Ok(())
        } else {
            Err(SimError::OnboardingStep {
                expected,
                actual: self.step,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Catalog, SimulatorConfig};

    fn simulator() -> Simulator {
        let config = SimulatorConfig::default().with_seed(5).without_latency();
        Simulator::manual(config, &Catalog::default()).unwrap().0
    }

    #[tokio::test]
    async fn test_happy_path() {
        let sim = simulator();
        let mut flow = OnboardingFlow::new(&sim);

        flow.verify_phone("+91 98765-43210").await.unwrap();
        assert_eq!(flow.step(), OnboardingStep::Profile);

        let node = flow
            .submit_profile("Sharma General Store", "Andheri West")
            .await
            .unwrap()
            .clone();
        assert!(node.assigned);
        assert_eq!(flow.step(), OnboardingStep::Assignment);

        let shop = flow.complete().unwrap();
        assert_eq!(shop.node, node);
        assert_eq!(shop.profile.name, "Sharma General Store");
        assert_eq!(flow.step(), OnboardingStep::Complete);
    }

    #[tokio::test]
    async fn test_latency_runs_on_simulated_clock() {
        let config = SimulatorConfig::default().with_seed(5);
        let (sim, scheduler) = Simulator::manual(config, &Catalog::default()).unwrap();
        let mut flow = OnboardingFlow::new(&sim);

        flow.verify_phone("9876543210").await.unwrap();
        assert_eq!(scheduler.clock().elapsed(), chrono::Duration::milliseconds(1_500));

        flow.submit_profile("Patel Kirana", "Dadar").await.unwrap();
        assert_eq!(scheduler.clock().elapsed(), chrono::Duration::milliseconds(2_500));
    }

    #[tokio::test]
    async fn test_short_phone_rejected() {
        let sim = simulator();
        let mut flow = OnboardingFlow::new(&sim);

        let result = flow.verify_phone("98765").await;
        assert!(matches!(result, Err(SimError::InvalidPhoneNumber(_))));

        let result = flow.verify_phone("98765abcde12").await;
        assert!(matches!(result, Err(SimError::InvalidPhoneNumber(_))));
        assert_eq!(flow.step(), OnboardingStep::Phone);
    }

    #[tokio::test]
    async fn test_incomplete_profile() {
        let sim = simulator();
        let mut flow = OnboardingFlow::new(&sim);
        flow.verify_phone("9876543210").await.unwrap();

        let result = flow.submit_profile("Sharma General Store", "  ").await;
        assert!(matches!(result, Err(SimError::IncompleteProfile(_))));
        assert_eq!(flow.step(), OnboardingStep::Profile);
        assert!(flow.node().is_none());
    }

    #[tokio::test]
    async fn test_steps_out_of_order() {
        let sim = simulator();
        let mut flow = OnboardingFlow::new(&sim);

        let result = flow.submit_profile("Shop", "Dadar").await;
        assert!(matches!(
            result,
            Err(SimError::OnboardingStep {
                expected: OnboardingStep::Profile,
                actual: OnboardingStep::Phone
            })
        ));

        assert!(flow.complete().is_err());
    }
}
