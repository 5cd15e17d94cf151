mod common;

use axum::http::StatusCode;
use common::ready_app;
use serde_json::json;

#[tokio::test]
async fn saving_goal_crud() {
    let (app, token) = ready_app().await;

    let (status, goal) = app
        .post(
            "/finances/saving-goals",
            Some(&token),
            json!({
                "name": "New Bike",
                "targetAmount": 1200,
                "currentAmount": 200,
                "monthlyPayment": 100
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{goal}");
    assert_eq!(goal["name"], "New Bike");
    assert_eq!(goal["color"], "#4CAF50");
    assert_eq!(goal["interestRateOption"], "NONE");
    let id = goal["id"].as_str().unwrap().to_string();

    let (status, body) = app.get("/finances/saving-goals", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app
        .put(
            &format!("/finances/saving-goals/{id}/name"),
            Some(&token),
            json!({ "name": "Road Bike" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Road Bike");

    let (status, body) = app
        .put(
            &format!("/finances/saving-goals/{id}/appearance"),
            Some(&token),
            json!({ "color": "#123456", "icon": "bike" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["icon"], "bike");

    let (status, _) = app
        .put(
            &format!("/finances/saving-goals/{id}/amounts"),
            Some(&token),
            json!({ "targetAmount": 0, "currentAmount": 0, "monthlyPayment": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .put(
            &format!("/finances/saving-goals/{id}/info"),
            Some(&token),
            json!({ "targetDate": "2030-01-01", "interestRateOption": "MONTHLY", "interestRate": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["interestRateOption"], "MONTHLY");
    assert_eq!(body["targetDate"], "2030-01-01");

    let (status, _) = app
        .put(
            &format!("/finances/saving-goals/{id}/info"),
            Some(&token),
            json!({ "targetDate": null, "interestRateOption": "YEARLY", "interestRate": null }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .delete(&format!("/finances/saving-goals/{id}"), Some(&token))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .get(&format!("/finances/saving-goals/{id}"), Some(&token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn goals_of_other_users_are_invisible() {
    let (app, admin_token) = ready_app().await;
    let other_token = app.create_user(&admin_token, "frank").await;

    let (_, goal) = app
        .post(
            "/finances/saving-goals",
            Some(&admin_token),
            json!({ "name": "Holiday", "targetAmount": 3000 }),
        )
        .await;
    let id = goal["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .get(&format!("/finances/saving-goals/{id}"), Some(&other_token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .delete(&format!("/finances/saving-goals/{id}"), Some(&other_token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = app.get("/finances/saving-goals", Some(&other_token)).await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = app
        .get(&format!("/finances/saving-goals/{id}"), Some(&admin_token))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn projection_of_saved_goal_and_unsaved_plan() {
    let (app, token) = ready_app().await;

    let (_, goal) = app
        .post(
            "/finances/saving-goals",
            Some(&token),
            json!({
                "name": "Laptop",
                "targetAmount": 1000,
                "currentAmount": 400,
                "monthlyPayment": 100
            }),
        )
        .await;
    let id = goal["id"].as_str().unwrap().to_string();

    let (status, projection) = app
        .get(
            &format!("/finances/saving-goals/{id}/projection"),
            Some(&token),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{projection}");
    assert_eq!(projection["monthsToTarget"], 6);
    assert_eq!(projection["periods"].as_array().unwrap().len(), 6);
    assert_eq!(projection["totalInterest"].as_f64().unwrap(), 0.0);

    let (status, projection) = app
        .post(
            "/finances/saving-goals/calculate",
            Some(&token),
            json!({
                "targetAmount": 500,
                "currentAmount": 0,
                "monthlyPayment": 50
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{projection}");
    assert_eq!(projection["monthsToTarget"], 10);

    let (status, _) = app
        .post(
            "/finances/saving-goals/calculate",
            Some(&token),
            json!({
                "targetAmount": 500,
                "currentAmount": 0,
                "monthlyPayment": 50,
                "interestRateOption": "MONTHLY"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_goal_bodies_are_bad_requests() {
    let (app, token) = ready_app().await;

    let (status, body) = app
        .post("/finances/saving-goals", Some(&token), json!({ "name": "x" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["code"], 400);
    assert!(body["message"].as_str().unwrap().contains("targetAmount"));

    let (status, body) = app
        .post(
            "/finances/saving-goals/calculate",
            Some(&token),
            json!({ "targetAmount": "lots", "currentAmount": 0, "monthlyPayment": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn oversized_amounts_are_rejected() {
    let (app, token) = ready_app().await;

    let (status, body) = app
        .post(
            "/finances/saving-goals/calculate",
            Some(&token),
            json!({
                "targetAmount": 7.9e28,
                "currentAmount": 7.0e28,
                "monthlyPayment": 0,
                "interestRateOption": "MONTHLY",
                "interestRate": 100,
                "targetDate": "2099-01-01"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["code"], 400);

    let (status, _) = app
        .post(
            "/finances/saving-goals",
            Some(&token),
            json!({
                "name": "Island",
                "targetAmount": 5.0e15,
                "currentAmount": 0,
                "monthlyPayment": 100
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
