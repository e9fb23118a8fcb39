// tests/persona_registry.rs


use preceptor::auth::Role;
use preceptor::error::AppError;
use preceptor::persona::{CreatePatientActor, UpdatePatientActor};
use preceptor::prompt::StructuredProfile;

fn new_persona(name: &str) -> CreatePatientActor {
    CreatePatientActor {
        name: name.to_string(),
        age: 45,
        is_public: false,
        prompt: String::new(),
        profile: StructuredProfile {
            chief_complaint: "Chest pain for two hours".to_string(),
            ..StructuredProfile::default()
        },
    }
}

#[tokio::test]
async fn slug_collisions_get_numeric_suffixes() {
    let state = test_helpers::default_test_app_state().await;
    let (owner, _) =
        test_helpers::create_user_with_token(&state, "Dana", "dana@example.edu", Role::Student)
            .await;

    let first = state
        .persona_store
        .create(&owner.id, new_persona("Dr. Smith!!"))
        .await
        .unwrap();
    assert_eq!(first.slug, "dr-smith");

    let second = state
        .persona_store
        .create(&owner.id, new_persona("dr smith"))
        .await
        .unwrap();
    assert_eq!(second.slug, "dr-smith-1");

    let third = state
        .persona_store
        .create(&owner.id, new_persona("Dr Smith"))
        .await
        .unwrap();
    assert_eq!(third.slug, "dr-smith-2");
}

#[tokio::test]
async fn slug_is_stable_across_renames() {
    let state = test_helpers::default_test_app_state().await;
    let (owner, _) =
        test_helpers::create_user_with_token(&state, "Dana", "dana@example.edu", Role::Student)
            .await;

    let created = state
        .persona_store
        .create(&owner.id, new_persona("Ada Lovelace"))
        .await
        .unwrap();
    assert_eq!(created.slug, "ada-lovelace");

    let updated = state
        .persona_store
        .update(
            &created.id,
            &owner.id,
            UpdatePatientActor {
                name: Some("Grace Hopper".to_string()),
                ..UpdatePatientActor::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Grace Hopper");
    assert_eq!(updated.slug, "ada-lovelace");
}

#[tokio::test]
async fn only_the_owner_can_update_or_delete() {
    let state = test_helpers::default_test_app_state().await;
    let (owner, _) =
        test_helpers::create_user_with_token(&state, "Dana", "dana@example.edu", Role::Student)
            .await;
    let (other, _) =
        test_helpers::create_user_with_token(&state, "Sam", "sam@example.edu", Role::Student)
            .await;

    let created = state
        .persona_store
        .create(&owner.id, new_persona("Maria Gonzales"))
        .await
        .unwrap();

    let err = state
        .persona_store
        .update(
            &created.id,
            &other.id,
            UpdatePatientActor {
                age: Some(50),
                ..UpdatePatientActor::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = state
        .persona_store
        .delete(&created.id, &other.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    state
        .persona_store
        .delete(&created.id, &owner.id)
        .await
        .unwrap();
    assert!(state.persona_store.get(&created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn private_persona_is_absent_from_public_lookup() {
    let state = test_helpers::default_test_app_state().await;
    let (owner, _) =
        test_helpers::create_user_with_token(&state, "Dana", "dana@example.edu", Role::Student)
            .await;

    let private = state
        .persona_store
        .create(&owner.id, new_persona("Hidden Case"))
        .await
        .unwrap();
    let err = state
        .persona_store
        .get_by_slug_public(&private.slug)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let mut public = new_persona("Open Case");
    public.is_public = true;
    let public = state.persona_store.create(&owner.id, public).await.unwrap();
    let found = state
        .persona_store
        .get_by_slug_public(&public.slug)
        .await
        .unwrap();
    assert_eq!(found.id, public.id);
}

#[tokio::test]
async fn starter_persona_slug_is_derived_from_owner_id() {
    let state = test_helpers::default_test_app_state().await;
    let (owner, _) =
        test_helpers::create_user_with_token(&state, "Dana", "dana@example.edu", Role::Student)
            .await;

    let starter = state.persona_store.create_starter(&owner.id).await.unwrap();
    let suffix: String = {
        let chars: Vec<char> = owner.id.chars().collect();
        chars[chars.len() - 6..].iter().collect()
    };
    assert_eq!(starter.slug, format!("philip-walters-{suffix}"));
    assert!(starter.is_public);
    assert!(starter.prompt.contains("Philip Walters"));
}

#[tokio::test]
async fn validation_rejects_blank_name_and_nonpositive_age() {
    let state = test_helpers::default_test_app_state().await;
    let (owner, _) =
        test_helpers::create_user_with_token(&state, "Dana", "dana@example.edu", Role::Student)
            .await;

    let err = state
        .persona_store
        .create(&owner.id, new_persona("   "))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut invalid = new_persona("Valid Name");
    invalid.age = 0;
    let err = state
        .persona_store
        .create(&owner.id, invalid)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn deleting_a_persona_removes_its_rubric_but_not_its_sessions() {
    let state = test_helpers::default_test_app_state().await;
    let (owner, _) =
        test_helpers::create_user_with_token(&state, "Dana", "dana@example.edu", Role::Student)
            .await;

    let persona = state
        .persona_store
        .create(&owner.id, new_persona("Transient Case"))
        .await
        .unwrap();
    state
        .rubric_store
        .upsert(
            &persona.id,
            preceptor::rubric::RubricData {
                categories: preceptor::rubric::standard_osce_rubric(),
                total_points: 0,
                passing_threshold: None,
                auto_grade_enabled: false,
            },
        )
        .await
        .unwrap();
    let session_id = state
        .session_store
        .create(&owner.id, &persona.id)
        .await
        .unwrap();

    state
        .persona_store
        .delete(&persona.id, &owner.id)
        .await
        .unwrap();

    assert!(state
        .rubric_store
        .get_for_persona(&persona.id)
        .await
        .unwrap()
        .is_none());
    // The transcript outlives the profile.
    assert!(state.session_store.get(&session_id).await.unwrap().is_some());
}
