// tests/submission_workflow.rs


use preceptor::auth::Role;
use preceptor::error::AppError;
use preceptor::persona::CreatePatientActor;
use preceptor::prompt::StructuredProfile;
use preceptor::state::AppState;
use preceptor::submission::SubmissionStatus;

struct Cast {
    state: AppState,
    student_id: String,
    instructor_id: String,
    session_id: String,
}

async fn setup() -> Cast {
    let state = test_helpers::default_test_app_state().await;
    let (student, _) =
        test_helpers::create_user_with_token(&state, "Kim", "kim@example.edu", Role::Student)
            .await;
    let (instructor, _) = test_helpers::create_user_with_token(
        &state,
        "Dr. Reyes",
        "reyes@example.edu",
        Role::Instructor,
    )
    .await;

    let persona = state
        .persona_store
        .create(
            &student.id,
            CreatePatientActor {
                name: "Omar Haddad".to_string(),
                age: 61,
                is_public: false,
                prompt: String::new(),
                profile: StructuredProfile::default(),
            },
        )
        .await
        .unwrap();
    let session_id = state
        .session_store
        .create(&student.id, &persona.id)
        .await
        .unwrap();

    Cast {
        state,
        student_id: student.id,
        instructor_id: instructor.id,
        session_id,
    }
}

#[tokio::test]
async fn submit_creates_a_pending_submission() {
    let cast = setup().await;
    let submission = cast
        .state
        .submission_store
        .submit(&cast.session_id, &cast.student_id, &cast.instructor_id)
        .await
        .unwrap();

    assert_eq!(submission.status, SubmissionStatus::Pending);
    assert_eq!(submission.instructor_id, cast.instructor_id);
    assert!(submission.feedback.is_none());
    assert!(submission.reviewed_at.is_none());
}

#[tokio::test]
async fn a_session_can_only_be_submitted_once() {
    let cast = setup().await;
    cast.state
        .submission_store
        .submit(&cast.session_id, &cast.student_id, &cast.instructor_id)
        .await
        .unwrap();

    let err = cast
        .state
        .submission_store
        .submit(&cast.session_id, &cast.student_id, &cast.instructor_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn submission_target_must_hold_a_reviewing_role() {
    let cast = setup().await;
    let (peer, _) = test_helpers::create_user_with_token(
        &cast.state,
        "Lee",
        "lee@example.edu",
        Role::Student,
    )
    .await;

    let err = cast
        .state
        .submission_store
        .submit(&cast.session_id, &cast.student_id, &peer.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn only_the_session_owner_can_submit_it() {
    let cast = setup().await;
    let (other, _) = test_helpers::create_user_with_token(
        &cast.state,
        "Lee",
        "lee@example.edu",
        Role::Student,
    )
    .await;

    let err = cast
        .state
        .submission_store
        .submit(&cast.session_id, &other.id, &cast.instructor_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn grade_presence_drives_status_transitions() {
    let cast = setup().await;
    let submission = cast
        .state
        .submission_store
        .submit(&cast.session_id, &cast.student_id, &cast.instructor_id)
        .await
        .unwrap();

    // Feedback without a grade: reviewed.
    let reviewed = cast
        .state
        .submission_store
        .update_feedback(&submission.id, &cast.instructor_id, "Good rapport.", None)
        .await
        .unwrap();
    assert_eq!(reviewed.status, SubmissionStatus::Reviewed);
    assert!(reviewed.reviewed_at.is_some());
    assert!(reviewed.grade.is_none());

    // Adding a grade: graded.
    let graded = cast
        .state
        .submission_store
        .update_feedback(
            &submission.id,
            &cast.instructor_id,
            "Good rapport.",
            Some("42/50"),
        )
        .await
        .unwrap();
    assert_eq!(graded.status, SubmissionStatus::Graded);
    assert_eq!(graded.grade.as_deref(), Some("42/50"));

    // Re-saving with an empty grade reverts to reviewed.
    let reverted = cast
        .state
        .submission_store
        .update_feedback(&submission.id, &cast.instructor_id, "Good rapport.", Some(""))
        .await
        .unwrap();
    assert_eq!(reverted.status, SubmissionStatus::Reviewed);
    assert!(reverted.grade.is_none());
}

#[tokio::test]
async fn feedback_is_gated_to_the_assigned_instructor() {
    let cast = setup().await;
    let (other_instructor, _) = test_helpers::create_user_with_token(
        &cast.state,
        "Dr. Okafor",
        "okafor@example.edu",
        Role::Instructor,
    )
    .await;
    let submission = cast
        .state
        .submission_store
        .submit(&cast.session_id, &cast.student_id, &cast.instructor_id)
        .await
        .unwrap();

    let err = cast
        .state
        .submission_store
        .update_feedback(&submission.id, &other_instructor.id, "Not mine.", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}

#[tokio::test]
async fn instructor_queue_lists_newest_first_and_filters_by_persona() {
    let cast = setup().await;
    let second_persona = cast
        .state
        .persona_store
        .create(
            &cast.student_id,
            CreatePatientActor {
                name: "Second Case".to_string(),
                age: 30,
                is_public: false,
                prompt: String::new(),
                profile: StructuredProfile::default(),
            },
        )
        .await
        .unwrap();
    let second_session = cast
        .state
        .session_store
        .create(&cast.student_id, &second_persona.id)
        .await
        .unwrap();

    cast.state
        .submission_store
        .submit(&cast.session_id, &cast.student_id, &cast.instructor_id)
        .await
        .unwrap();
    cast.state
        .submission_store
        .submit(&second_session, &cast.student_id, &cast.instructor_id)
        .await
        .unwrap();

    let all = cast
        .state
        .submission_store
        .list_for_instructor(&cast.instructor_id, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].submission.chat_session_id, second_session);
    assert_eq!(all[0].student.email, "kim@example.edu");

    let filtered = cast
        .state
        .submission_store
        .list_for_instructor(&cast.instructor_id, Some(&second_persona.id))
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(
        filtered[0].patient_actor.as_ref().map(|p| p.id.as_str()),
        Some(second_persona.id.as_str())
    );
}
