use cineapp_catalog::{CatalogClient, CatalogError, MovieForm};
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> CatalogClient {
    CatalogClient::new(&server.uri(), Client::new()).unwrap()
}

#[tokio::test]
async fn test_public_movies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/public/peliculas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "titulo": "Heat", "director": "Mann", "anio": 1995, "genero": "Crimen"},
            {"id": 2, "titulo": "Alien", "descripcion": "En el espacio..."}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let movies = client_for(&mock_server).public_movies().await.unwrap();

    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].title, "Heat");
    assert_eq!(movies[0].year, Some(1995));
    assert_eq!(movies[1].director, None);
}

#[tokio::test]
async fn test_private_movies_send_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/private/peliculas"))
        .and(header("Authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "titulo": "Amélie"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let movies = client_for(&mock_server)
        .private_movies("user-token")
        .await
        .unwrap();

    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].id, 5);
}

#[tokio::test]
async fn test_personal_list_mutations() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/private/peliculas/agregar/5"))
        .and(header("Authorization", "Bearer user-token"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/private/peliculas/remover/5"))
        .and(header("Authorization", "Bearer user-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.add_to_list("user-token", 5).await.unwrap();
    client.remove_from_list("user-token", 5).await.unwrap();
}

#[tokio::test]
async fn test_admin_crud() {
    let mock_server = MockServer::start().await;
    let form = MovieForm::new("Inception", "Nolan", 2010).with_genre("Ciencia ficción");

    Mock::given(method("POST"))
        .and(path("/admin/peliculas"))
        .and(header("Authorization", "Bearer admin-token"))
        .and(body_json(json!({
            "titulo": "Inception",
            "director": "Nolan",
            "año": 2010,
            "genero": "Ciencia ficción",
            "descripcion": "Sin descripción",
            "esPublica": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 10})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/admin/peliculas/10"))
        .and(header("Authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/admin/peliculas/10"))
        .and(header("Authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.create_movie("admin-token", &form).await.unwrap();
    client
        .update_movie("admin-token", 10, &form.clone().with_public(false))
        .await
        .unwrap();
    client.delete_movie("admin-token", 10).await.unwrap();
}

#[tokio::test]
async fn test_admin_listing_forbidden() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/peliculas"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .admin_movies("client-token")
        .await
        .unwrap_err();

    assert!(err.is_forbidden());
    match err {
        CatalogError::Api { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "Forbidden");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_year_is_not_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/peliculas"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .create_movie("admin-token", &MovieForm::new("Viaje", "Méliès", 1800))
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Validation(_)));
}
