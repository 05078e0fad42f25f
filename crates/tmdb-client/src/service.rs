//! `CatalogService` over the TMDB endpoints.
//!
//! GET /search/movie, /movie/top_rated, /movie/{id}, /movie/{id}/videos,
//! /genre/movie/list

use async_trait::async_trait;
use catalog::{
    CatalogService, Genre, GenreCatalog, MovieDetails, MovieId, RawSearchResult, Result, Video,
};
use serde::Deserialize;
use tracing::debug;

use crate::TmdbClient;

/// One page of `/search/movie` or `/movie/top_rated`
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct ResultPage<T> {
    #[serde(default)]
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenreList {
    pub genres: Vec<Genre>,
}

#[async_trait]
impl CatalogService for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn search(
        &self,
        query: &str,
        genre_filter: Option<&str>,
    ) -> Result<Vec<RawSearchResult>> {
        let mut extra = vec![("query", query)];
        if let Some(genres) = genre_filter {
            extra.push(("with_genres", genres));
        }

        let page: ResultPage<RawSearchResult> = self.get("/search/movie", &extra).await?;
        debug!(query, results = page.results.len(), "TMDB search");
        Ok(page.results)
    }

    async fn top_rated(&self, genre_filter: Option<&str>) -> Result<Vec<RawSearchResult>> {
        let extra: Vec<(&'static str, &str)> = genre_filter
            .map(|genres| vec![("with_genres", genres)])
            .unwrap_or_default();

        let page: ResultPage<RawSearchResult> = self.get("/movie/top_rated", &extra).await?;
        Ok(page.results)
    }

    async fn movie_details(&self, id: MovieId) -> Result<MovieDetails> {
        self.get(&format!("/movie/{}", id), &[]).await
    }

    async fn movie_videos(&self, id: MovieId) -> Result<Vec<Video>> {
        let page: ResultPage<Video> = self.get(&format!("/movie/{}/videos", id), &[]).await?;
        Ok(page.results)
    }

    async fn genre_catalog(&self) -> Result<GenreCatalog> {
        let list: GenreList = self.get("/genre/movie/list", &[]).await?;
        Ok(GenreCatalog::from_genres(list.genres))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::decode_body;

    #[test]
    fn test_decode_search_page() {
        let body = r#"{
            "page": 1,
            "results": [
                {"adult": false, "id": 10195, "title": "Thor", "poster_path": "/prSfAi1xGrhLQNxVSUFh61xQ4Qy.jpg",
                 "vote_average": 6.8, "genre_ids": [12, 14, 28], "popularity": 70.2},
                {"adult": false, "id": 616037, "title": "Thor: Love and Thunder", "poster_path": null,
                 "vote_average": 6.4, "genre_ids": [14, 28, 35]}
            ],
            "total_pages": 3,
            "total_results": 52
        }"#;
        let page: ResultPage<RawSearchResult> = decode_body(200, body).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].genre_ids, vec![12, 14, 28]);
        assert!(page.results[1].poster_path.is_none());
    }

    #[test]
    fn test_decode_video_list() {
        let body = r#"{"id": 10195, "results": [
            {"iso_639_1": "en", "name": "Official Trailer", "key": "JOddp-nlNvQ", "site": "YouTube",
             "size": 1080, "type": "Trailer", "official": true, "id": "533ec654c3a36854480003eb"}
        ]}"#;
        let page: ResultPage<Video> = decode_body(200, body).unwrap();
        assert!(page.results[0].is_youtube_trailer());
        assert_eq!(page.results[0].key, "JOddp-nlNvQ");
    }

    #[test]
    fn test_decode_genre_list() {
        let body = r#"{"genres": [{"id": 28, "name": "Action"}, {"id": 12, "name": "Adventure"}]}"#;
        let list: GenreList = decode_body(200, body).unwrap();
        let catalog = GenreCatalog::from_genres(list.genres);
        assert_eq!(catalog.resolve(&[12, 28]).unwrap(), vec!["Adventure", "Action"]);
    }

    #[test]
    fn test_decode_movie_details_with_odd_vote_count() {
        let body = r#"{"id": 10195, "title": "Thor", "vote_count": "n/a", "runtime": 115}"#;
        let details: MovieDetails = decode_body(200, body).unwrap();
        assert_eq!(details.vote_count(), None);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let config = crate::ClientConfig::new("key").with_base_url("http://127.0.0.1:1");
        let client = TmdbClient::new(config).unwrap();

        let err = client.genre_names(&[28]).await.unwrap_err();
        assert!(matches!(err, catalog::CatalogError::Transport(_)));
    }
}
