//! Screen flow around the game: sign in, pick or create a character, play.
//!
//! Screens (or a bootstrap) send [`AccountCommand`]s. Forms are validated
//! before anything touches the identity provider or the store, and every
//! result comes back as an [`AccountStatus`].

use bevy::prelude::*;
use thiserror::Error;

use super::identity::{Auth, AuthError, Identity};
use super::record::CharacterRecord;
use super::store::{character_path, characters_path, CharacterStore, Store, StoreError};
use super::sync::ActiveCharacter;
use crate::core::Screen;
use crate::player::{spawn_player, Player, PlayerAnimations, PlayerConfig, PlayerLocator};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Email is required")]
    MissingEmail,

    #[error("Password is required")]
    MissingPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Account name is required")]
    MissingAccountName,

    #[error("Character name is required")]
    MissingCharacterName,

    #[error("Character name may not contain '/'")]
    InvalidCharacterName,

    #[error("Not signed in")]
    NotSignedIn,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormError> {
        if self.email.trim().is_empty() {
            return Err(FormError::MissingEmail);
        }
        if self.password.is_empty() {
            return Err(FormError::MissingPassword);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub account_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), FormError> {
        if self.email.trim().is_empty() {
            return Err(FormError::MissingEmail);
        }
        if self.password.is_empty() {
            return Err(FormError::MissingPassword);
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if self.account_name.trim().is_empty() {
            return Err(FormError::MissingAccountName);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterForm {
    pub name: String,
}

impl CharacterForm {
    /// The trimmed character name, if the form is usable by `user`.
    pub fn validate(&self, user: Option<&Identity>) -> Result<String, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingCharacterName);
        }
        if name.contains('/') {
            return Err(FormError::InvalidCharacterName);
        }
        if user.is_none() {
            return Err(FormError::NotSignedIn);
        }
        Ok(name.to_string())
    }
}

#[derive(Event, Debug, Clone, PartialEq)]
pub enum AccountCommand {
    SignIn(LoginForm),
    SignUp(SignUpForm),
    SignOut,
    CreateCharacter(CharacterForm),
    SelectCharacter(String),
    /// Switch between menu screens. Play is only reached by selecting a
    /// character.
    Navigate(Screen),
    LeaveGame,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub enum AccountStatus {
    SignedIn(Identity),
    SignedOut,
    CharacterCreated(String),
    CharacterLoaded(String),
    Invalid(FormError),
    AuthFailed(AuthError),
    StoreFailed(StoreError),
}

/// One dashboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSummary {
    pub name: String,
    pub level: u32,
}

/// Characters of the signed-in user, refreshed on every dashboard visit.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct CharacterList(pub Vec<CharacterSummary>);

/// Whether a menu screen may be opened.
pub fn can_navigate(target: Screen, signed_in: bool) -> bool {
    match target {
        Screen::Login | Screen::CreateAccount => true,
        Screen::Dashboard | Screen::CreateCharacter | Screen::ManageAccount => signed_in,
        Screen::PlayUI => false,
    }
}

/// `(name, level)` for every character of `user_id`, sorted by name.
pub fn list_characters(
    store: &dyn CharacterStore,
    user_id: &str,
) -> Result<Vec<CharacterSummary>, StoreError> {
    let Some(serde_json::Value::Object(characters)) = store.read(&characters_path(user_id))? else {
        return Ok(Vec::new());
    };

    let mut list: Vec<CharacterSummary> = characters
        .into_iter()
        .map(|(name, record)| CharacterSummary {
            level: record
                .get("level")
                .and_then(|level| level.as_u64())
                .map_or(1, |level| level as u32),
            name,
        })
        .collect();
    list.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(list)
}

pub fn load_character(
    store: &dyn CharacterStore,
    user_id: &str,
    name: &str,
) -> Result<CharacterRecord, StoreError> {
    let path = character_path(user_id, name);
    match store.read(&path)? {
        Some(value) => CharacterRecord::from_value(&path, value),
        None => Err(StoreError::NotFound(path)),
    }
}

/// Write a fresh character and return its path.
pub fn create_character(
    store: &mut dyn CharacterStore,
    user_id: &str,
    name: &str,
) -> Result<String, StoreError> {
    let path = character_path(user_id, name);
    store.write(&path, CharacterRecord::default().to_fields())?;
    Ok(path)
}

/// Apply every pending account command.
#[allow(clippy::too_many_arguments)]
pub fn handle_account_commands(
    mut commands: Commands,
    mut requests: EventReader<AccountCommand>,
    mut status: EventWriter<AccountStatus>,
    mut auth: ResMut<Auth>,
    mut store: ResMut<Store>,
    mut next_screen: ResMut<NextState<Screen>>,
    mut locator: ResMut<PlayerLocator>,
    config: Res<PlayerConfig>,
    animations: Option<Res<PlayerAnimations>>,
    players: Query<Entity, With<Player>>,
) {
    for request in requests.read() {
        match request {
            AccountCommand::SignIn(form) => {
                if let Err(e) = form.validate() {
                    warn!("Sign in: {}", e);
                    status.send(AccountStatus::Invalid(e));
                    continue;
                }
                match auth.0.sign_in(form.email.trim(), &form.password) {
                    Ok(identity) => {
                        info!("Signed in as {}", identity.email);
                        next_screen.set(Screen::Dashboard);
                        status.send(AccountStatus::SignedIn(identity));
                    }
                    Err(e) => {
                        error!("Sign in failed: {}", e);
                        status.send(AccountStatus::AuthFailed(e));
                    }
                }
            }
            AccountCommand::SignUp(form) => {
                if let Err(e) = form.validate() {
                    warn!("Sign up: {}", e);
                    status.send(AccountStatus::Invalid(e));
                    continue;
                }
                match auth
                    .0
                    .sign_up(form.email.trim(), &form.password, form.account_name.trim())
                {
                    Ok(identity) => {
                        info!("Created account {}", identity.email);
                        next_screen.set(Screen::Dashboard);
                        status.send(AccountStatus::SignedIn(identity));
                    }
                    Err(e) => {
                        error!("Sign up failed: {}", e);
                        status.send(AccountStatus::AuthFailed(e));
                    }
                }
            }
            AccountCommand::SignOut => {
                auth.0.sign_out();
                commands.insert_resource(CharacterList::default());
                info!("Signed out");
                next_screen.set(Screen::Login);
                status.send(AccountStatus::SignedOut);
            }
            AccountCommand::CreateCharacter(form) => {
                let user = auth.0.current();
                let name = match form.validate(user) {
                    Ok(name) => name,
                    Err(e) => {
                        warn!("Create character: {}", e);
                        status.send(AccountStatus::Invalid(e));
                        continue;
                    }
                };
                let Some(user) = user else {
                    continue;
                };
                match create_character(store.0.as_mut(), &user.id, &name) {
                    Ok(path) => {
                        info!("Created character at {}", path);
                        next_screen.set(Screen::Dashboard);
                        status.send(AccountStatus::CharacterCreated(name));
                    }
                    Err(e) => {
                        error!("Failed to create character: {}", e);
                        status.send(AccountStatus::StoreFailed(e));
                    }
                }
            }
            AccountCommand::SelectCharacter(name) => {
                let Some(user) = auth.0.current() else {
                    warn!("Select character: {}", FormError::NotSignedIn);
                    status.send(AccountStatus::Invalid(FormError::NotSignedIn));
                    continue;
                };
                let record = match load_character(store.0.as_ref(), &user.id, name) {
                    Ok(record) => record,
                    Err(e) => {
                        error!("Failed to load character {}: {}", name, e);
                        status.send(AccountStatus::StoreFailed(e));
                        continue;
                    }
                };

                for entity in players.iter() {
                    commands.entity(entity).despawn_recursive();
                }
                spawn_player(
                    &mut commands,
                    &mut locator,
                    &record,
                    &config,
                    animations.as_deref(),
                );
                info!(
                    "Playing {} (level {}, {} gold)",
                    name, record.level, record.gold_amount
                );
                commands.insert_resource(ActiveCharacter::new(&user.id, name, record));
                next_screen.set(Screen::PlayUI);
                status.send(AccountStatus::CharacterLoaded(name.clone()));
            }
            AccountCommand::Navigate(target) => {
                if can_navigate(*target, auth.0.current().is_some()) {
                    next_screen.set(*target);
                } else {
                    warn!("Can't open {:?} from here", target);
                }
            }
            AccountCommand::LeaveGame => next_screen.set(Screen::Dashboard),
        }
    }
}

/// Reload the dashboard's character list.
pub fn refresh_character_list(auth: Res<Auth>, store: Res<Store>, mut list: ResMut<CharacterList>) {
    let Some(user) = auth.0.current() else {
        list.0.clear();
        return;
    };
    match list_characters(store.0.as_ref(), &user.id) {
        Ok(characters) => {
            info!("{} has {} characters", user.account_name(), characters.len());
            list.0 = characters;
        }
        Err(e) => error!("Failed to list characters: {}", e),
    }
}

/// Escape leaves the game for the dashboard.
pub fn leave_game_on_escape(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut requests: EventWriter<AccountCommand>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        requests.send(AccountCommand::LeaveGame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MemoryStore;
    use pretty_assertions::assert_eq;

    fn identity() -> Identity {
        Identity {
            id: "u1".to_string(),
            email: "a@b.io".to_string(),
            display_name: String::new(),
        }
    }

    #[test]
    fn login_needs_email_and_password() {
        let form = LoginForm {
            email: "  ".to_string(),
            password: "x".to_string(),
        };
        assert_eq!(form.validate(), Err(FormError::MissingEmail));

        let form = LoginForm {
            email: "a@b.io".to_string(),
            password: String::new(),
        };
        assert_eq!(form.validate(), Err(FormError::MissingPassword));
    }

    #[test]
    fn sign_up_checks_confirmation_before_name() {
        let mut form = SignUpForm {
            account_name: String::new(),
            email: "a@b.io".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret2".to_string(),
        };
        assert_eq!(form.validate(), Err(FormError::PasswordMismatch));

        form.confirm_password = "secret1".to_string();
        assert_eq!(form.validate(), Err(FormError::MissingAccountName));

        form.account_name = "Ayla".to_string();
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn character_form_needs_a_name_and_a_user() {
        let user = identity();
        let form = |name: &str| CharacterForm {
            name: name.to_string(),
        };

        assert_eq!(form("").validate(Some(&user)), Err(FormError::MissingCharacterName));
        assert_eq!(form("a/b").validate(Some(&user)), Err(FormError::InvalidCharacterName));
        assert_eq!(form("Ayla").validate(None), Err(FormError::NotSignedIn));
        assert_eq!(form(" Ayla ").validate(Some(&user)), Ok("Ayla".to_string()));
    }

    #[test]
    fn play_is_only_reached_by_selecting() {
        assert!(can_navigate(Screen::CreateAccount, false));
        assert!(!can_navigate(Screen::Dashboard, false));
        assert!(can_navigate(Screen::ManageAccount, true));
        assert!(!can_navigate(Screen::PlayUI, true));
    }

    #[test]
    fn created_characters_are_listed_and_loadable() {
        let mut store = MemoryStore::default();
        create_character(&mut store, "u1", "Zed").unwrap();
        create_character(&mut store, "u1", "Ayla").unwrap();
        create_character(&mut store, "u2", "Other").unwrap();

        assert_eq!(
            list_characters(&store, "u1").unwrap(),
            vec![
                CharacterSummary {
                    name: "Ayla".to_string(),
                    level: 1
                },
                CharacterSummary {
                    name: "Zed".to_string(),
                    level: 1
                },
            ]
        );
        assert_eq!(
            load_character(&store, "u1", "Ayla").unwrap(),
            CharacterRecord::default()
        );
        assert!(matches!(
            load_character(&store, "u1", "Nobody"),
            Err(StoreError::NotFound(_))
        ));
        assert!(list_characters(&store, "u3").unwrap().is_empty());
    }
}
