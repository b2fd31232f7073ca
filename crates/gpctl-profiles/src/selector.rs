use std::sync::Arc;

use gpctl_utils::GpError;
use gpctl_utils::domain::sanitize_domain;
use gpctl_utils::error::ProfileError;
use gpctl_utils::prompt::Prompter;
use tracing::{debug, info};

use crate::bindings::BindingStore;
use crate::token_file::{CredentialProfile, TokenStore};

/// Picks the credential profile for a command
#[derive(Clone)]
pub struct ProfileSelector {
    tokens: Arc<dyn TokenStore>,
    bindings: Arc<dyn BindingStore>,
}

impl ProfileSelector {
    #[must_use]
    pub fn new(tokens: Arc<dyn TokenStore>, bindings: Arc<dyn BindingStore>) -> Self {
        Self { tokens, bindings }
    }

    #[must_use]
    pub fn bindings(&self) -> &dyn BindingStore {
        self.bindings.as_ref()
    }

    /// Every profile, or `NoProfilesFound`
    pub fn profiles(&self) -> Result<Vec<CredentialProfile>, ProfileError> {
        let profiles = self.tokens.profiles()?;
        if profiles.is_empty() {
            return Err(ProfileError::NoProfilesFound {
                path: self.tokens.describe(),
            });
        }
        Ok(profiles)
    }

    /// Resolve an explicitly named profile without prompting
    pub fn select_named(&self, name: &str) -> Result<CredentialProfile, ProfileError> {
        find(self.profiles()?, name)
    }

    /// Choose a profile, preferring the one bound to `domain`.
    ///
    /// A bound profile is offered first (default yes). Otherwise an interactive
    /// user picks from the list and the choice is bound to the domain; a
    /// non-interactive run only succeeds when exactly one profile exists.
    pub fn select(
        &self,
        domain: Option<&str>,
        prompter: &dyn Prompter,
    ) -> Result<CredentialProfile, GpError> {
        let domain = domain.map(sanitize_domain).transpose()?;
        let profiles = self.profiles()?;

        if let Some(domain) = &domain {
            if let Some(bound) = self.bindings.get(domain)? {
                let accepted = !prompter.is_interactive()
                    || prompter.confirm(
                        &format!("Use cached profile '{bound}' for {domain}?"),
                        true,
                    );
                if accepted {
                    debug!(domain = %domain, profile = %bound, "Using bound profile");
                    return Ok(find(profiles, &bound)?);
                }
            }
        }

        if !prompter.is_interactive() {
            return match <[CredentialProfile; 1]>::try_from(profiles) {
                Ok([only]) => {
                    debug!(profile = %only.name, "Only one profile available");
                    Ok(only)
                }
                Err(profiles) => Err(ProfileError::AmbiguousProfile {
                    available: names(&profiles),
                }
                .into()),
            };
        }

        let options = names(&profiles);
        let question = match &domain {
            Some(domain) => format!("Select a credential profile for {domain}:"),
            None => "Select a credential profile:".to_string(),
        };
        let Some(idx) = prompter.choose(&question, &options) else {
            return Err(ProfileError::AmbiguousProfile { available: options }.into());
        };
        let chosen = profiles
            .into_iter()
            .nth(idx)
            .ok_or(ProfileError::AmbiguousProfile {
                available: options.clone(),
            })?;

        if let Some(domain) = &domain {
            self.bindings.set(domain, &chosen.name)?;
            info!(domain = %domain, profile = %chosen.name, "Bound domain to profile");
        }
        Ok(chosen)
    }
}

fn find(profiles: Vec<CredentialProfile>, name: &str) -> Result<CredentialProfile, ProfileError> {
    profiles
        .into_iter()
        .find(|p| p.name == name)
        .ok_or_else(|| ProfileError::ProfileNotFound {
            name: name.to_string(),
        })
}

fn names(profiles: &[CredentialProfile]) -> Vec<String> {
    profiles.iter().map(|p| p.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::MemoryBindingStore;
    use crate::token_file::MemoryTokenStore;
    use gpctl_utils::error::DomainError;
    use gpctl_utils::test_support::{Answer, ScriptedPrompter, fake_token};

    fn selector(names: &[&str]) -> (ProfileSelector, Arc<MemoryBindingStore>) {
        let profiles = names
            .iter()
            .enumerate()
            .map(|(i, n)| CredentialProfile::new(*n, fake_token(i as u8)))
            .collect();
        let bindings = Arc::new(MemoryBindingStore::new());
        let selector = ProfileSelector::new(
            Arc::new(MemoryTokenStore::new(profiles)),
            Arc::clone(&bindings) as Arc<dyn BindingStore>,
        );
        (selector, bindings)
    }

    #[test]
    fn test_single_profile_non_interactive_needs_no_prompt() {
        let (selector, _) = selector(&["only"]);
        let prompter = ScriptedPrompter::non_interactive();
        let chosen = selector.select(None, &prompter).unwrap();
        assert_eq!(chosen.name, "only");
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_no_profiles() {
        let (selector, _) = selector(&[]);
        let err = selector
            .select(None, &ScriptedPrompter::non_interactive())
            .unwrap_err();
        assert!(matches!(
            err,
            GpError::Profile(ProfileError::NoProfilesFound { .. })
        ));
    }

    #[test]
    fn test_many_profiles_non_interactive_is_ambiguous() {
        let (selector, _) = selector(&["a", "b"]);
        let err = selector
            .select(Some("example.com"), &ScriptedPrompter::non_interactive())
            .unwrap_err();
        match err {
            GpError::Profile(ProfileError::AmbiguousProfile { available }) => {
                assert_eq!(available, vec!["a", "b"]);
            }
            other => panic!("expected AmbiguousProfile, got {other:?}"),
        }
    }

    #[test]
    fn test_interactive_choice_is_bound_to_sanitized_domain() {
        let (selector, bindings) = selector(&["a", "b"]);
        let prompter = ScriptedPrompter::interactive([Answer::Choose(Some(1))]);

        let chosen = selector
            .select(Some("https://www.Example.com/wp-admin"), &prompter)
            .unwrap();
        assert_eq!(chosen.name, "b");
        assert_eq!(bindings.get("Example.com").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_binding_used_non_interactively() {
        let (selector, bindings) = selector(&["a", "b"]);
        bindings.set("example.com", "b").unwrap();

        let chosen = selector
            .select(Some("example.com"), &ScriptedPrompter::non_interactive())
            .unwrap();
        assert_eq!(chosen.name, "b");
    }

    #[test]
    fn test_binding_confirmed_interactively() {
        let (selector, bindings) = selector(&["a", "b"]);
        bindings.set("example.com", "a").unwrap();
        let prompter = ScriptedPrompter::interactive([Answer::Confirm(true)]);

        let chosen = selector.select(Some("example.com"), &prompter).unwrap();
        assert_eq!(chosen.name, "a");
        assert!(prompter.asked()[0].contains("'a'"));
    }

    #[test]
    fn test_declined_binding_falls_back_to_choice_and_rebinds() {
        let (selector, bindings) = selector(&["a", "b"]);
        bindings.set("example.com", "a").unwrap();
        let prompter =
            ScriptedPrompter::interactive([Answer::Confirm(false), Answer::Choose(Some(1))]);

        let chosen = selector.select(Some("example.com"), &prompter).unwrap();
        assert_eq!(chosen.name, "b");
        assert_eq!(bindings.get("example.com").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_binding_to_removed_profile() {
        let (selector, bindings) = selector(&["a"]);
        bindings.set("example.com", "gone").unwrap();

        let err = selector
            .select(Some("example.com"), &ScriptedPrompter::non_interactive())
            .unwrap_err();
        match err {
            GpError::Profile(ProfileError::ProfileNotFound { name }) => assert_eq!(name, "gone"),
            other => panic!("expected ProfileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_abandoned_choice_is_ambiguous() {
        let (selector, bindings) = selector(&["a", "b"]);
        let prompter = ScriptedPrompter::interactive([Answer::Choose(None)]);
        let err = selector.select(Some("example.com"), &prompter).unwrap_err();
        assert!(matches!(
            err,
            GpError::Profile(ProfileError::AmbiguousProfile { .. })
        ));
        assert!(bindings.all().unwrap().is_empty());
    }

    #[test]
    fn test_interactive_without_domain_does_not_bind() {
        let (selector, bindings) = selector(&["a", "b"]);
        let prompter = ScriptedPrompter::interactive([Answer::Choose(Some(0))]);
        assert_eq!(selector.select(None, &prompter).unwrap().name, "a");
        assert!(bindings.all().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_domain_fails_before_lookup() {
        let (selector, _) = selector(&[]);
        let err = selector
            .select(Some("not a domain"), &ScriptedPrompter::non_interactive())
            .unwrap_err();
        assert!(matches!(
            err,
            GpError::Domain(DomainError::InvalidDomain { .. })
        ));
    }

    #[test]
    fn test_select_named() {
        let (selector, _) = selector(&["a", "b"]);
        assert_eq!(selector.select_named("b").unwrap().name, "b");
        assert!(matches!(
            selector.select_named("c"),
            Err(ProfileError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn test_rebinding_keeps_only_latest() {
        let (selector, bindings) = selector(&["a", "b"]);
        for pick in [0usize, 1] {
            let prompter = ScriptedPrompter::interactive([
                Answer::Confirm(false),
                Answer::Choose(Some(pick)),
            ]);
            selector.select(Some("d.com"), &prompter).unwrap();
        }
        assert_eq!(bindings.get("d.com").unwrap().as_deref(), Some("b"));
        assert_eq!(bindings.all().unwrap().len(), 1);
    }
}
