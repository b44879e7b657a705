//! HTML scraping for the HLTV ranking, team, and team stats pages.
//!
//! Parsers are lenient per row (a malformed row is skipped with a warning)
//! but fail when a page yields nothing usable, which is what a layout change
//! or a bot-challenge page looks like.

use crate::error::CoreError;
use crate::model::{
    MatchResult, NewsLink, PlayerRef, RankingEntry, StatsOverview, TeamDetail, TeamRef,
    TeamStats, squash_whitespace,
};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::warn;

fn selector(css: &str) -> Result<Selector, CoreError> {
    Selector::parse(css).map_err(|e| CoreError::Parse(format!("bad selector {css}: {e:?}")))
}

fn regex(pattern: &str) -> Result<Regex, CoreError> {
    Regex::new(pattern).map_err(|e| CoreError::Parse(format!("bad pattern {pattern}: {e}")))
}

fn element_text(el: &ElementRef<'_>) -> String {
    squash_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

fn first_text(scope: &ElementRef<'_>, sel: &Selector) -> Option<String> {
    scope
        .select(sel)
        .next()
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
}

fn first_number(number: &Regex, text: &str) -> Option<i64> {
    number
        .find(text)
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

fn id_from_href(path: &Regex, href: &str) -> Option<i64> {
    path.captures(href)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// # Errors
///
/// Will return `Err` if the page contains no ranked teams
pub fn parse_ranking(html: &str) -> Result<Vec<RankingEntry>, CoreError> {
    let doc = Html::parse_document(html);
    let team_sel = selector(".ranked-team")?;
    let position_sel = selector(".position")?;
    let name_sel = selector(".teamLine .name")?;
    let points_sel = selector(".teamLine .points")?;
    let change_sel = selector(".change")?;
    let link_sel = selector("a[href]")?;
    let team_path = regex(r"^/team/(\d+)/")?;
    let number = regex(r"-?[\d,]+")?;

    let mut ranking = Vec::new();
    for block in doc.select(&team_sel) {
        let rank = first_text(&block, &position_sel)
            .and_then(|text| first_number(&number, &text))
            .and_then(|n| u32::try_from(n).ok());
        let name = first_text(&block, &name_sel);
        let id = block
            .select(&link_sel)
            .filter_map(|a| a.value().attr("href"))
            .find_map(|href| id_from_href(&team_path, href));

        let (Some(rank), Some(name), Some(id)) = (rank, name, id) else {
            warn!("skipping ranked team block without position, name, or team link");
            continue;
        };

        let points = first_text(&block, &points_sel)
            .and_then(|text| first_number(&number, &text))
            .and_then(|n| u32::try_from(n).ok());
        let change = first_text(&block, &change_sel)
            .and_then(|text| first_number(&number, &text))
            .and_then(|n| i32::try_from(n).ok());

        ranking.push(RankingEntry {
            rank,
            team: TeamRef { id, name },
            points,
            change,
        });
    }

    if ranking.is_empty() {
        return Err(CoreError::Parse(
            "no ranked teams found on ranking page".to_string(),
        ));
    }
    Ok(ranking)
}

/// # Errors
///
/// Will return `Err` if the page has no team name
pub fn parse_team(id: i64, html: &str) -> Result<TeamDetail, CoreError> {
    let doc = Html::parse_document(html);
    let root = doc.root_element();
    let name_sel = selector(".profile-team-name")?;
    let logo_sel = selector("img.teamlogo")?;
    let country_sel = selector(".team-country")?;
    let stat_sel = selector(".profile-team-stat")?;
    let player_sel = selector(".bodyshot-team a[href]")?;
    let news_sel = selector("#newsBox a[href]")?;
    let player_path = regex(r"^/player/(\d+)/")?;
    let number = regex(r"\d+")?;

    let name = first_text(&root, &name_sel)
        .ok_or_else(|| CoreError::Parse(format!("no team name on team page {id}")))?;

    let logo = root
        .select(&logo_sel)
        .find_map(|img| img.value().attr("src"))
        .map(str::to_string);
    let country = first_text(&root, &country_sel);

    let rank = root
        .select(&stat_sel)
        .map(|stat| element_text(&stat))
        .find(|text| text.contains("World ranking"))
        .and_then(|text| first_number(&number, &text))
        .and_then(|n| u32::try_from(n).ok());

    let mut seen = HashSet::new();
    let mut players = Vec::new();
    for link in root.select(&player_sel) {
        let Some(player_id) = link
            .value()
            .attr("href")
            .and_then(|href| id_from_href(&player_path, href))
        else {
            continue;
        };
        if !seen.insert(player_id) {
            continue;
        }
        let player_name = link
            .value()
            .attr("title")
            .map(squash_whitespace)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| element_text(&link));
        players.push(PlayerRef {
            id: player_id,
            name: player_name,
        });
    }

    let news = root
        .select(&news_sel)
        .filter_map(|link| {
            let href = link.value().attr("href")?;
            Some(NewsLink {
                name: element_text(&link),
                link: href.to_string(),
            })
        })
        .collect();

    Ok(TeamDetail {
        id,
        name,
        logo,
        country,
        rank,
        players,
        news,
    })
}

/// Builds a stats record from the overview page and the match history page.
///
/// A missing name or an empty match table is not an error here; callers
/// decide what an incomplete record means.
///
/// # Errors
///
/// Will return `Err` if a selector or pattern fails to compile
pub fn parse_team_stats(
    id: i64,
    overview_html: &str,
    matches_html: &str,
) -> Result<TeamStats, CoreError> {
    let overview_doc = Html::parse_document(overview_html);
    let name_sel = selector(".context-item-name")?;
    let name = first_text(&overview_doc.root_element(), &name_sel).unwrap_or_default();
    let overview = parse_overview(&overview_doc)?;

    let matches_doc = Html::parse_document(matches_html);
    let matches = parse_matches(&matches_doc)?;

    Ok(TeamStats {
        id,
        name,
        overview,
        matches,
    })
}

fn parse_overview(doc: &Html) -> Result<StatsOverview, CoreError> {
    let box_sel = selector(".standard-box.big-padding")?;
    let value_sel = selector(".large-strong")?;
    let label_sel = selector(".small-label-below")?;
    let number = regex(r"\d+")?;

    let mut overview = StatsOverview::default();
    for stat in doc.select(&box_sel) {
        let (Some(value), Some(label)) = (
            first_text(&stat, &value_sel),
            first_text(&stat, &label_sel),
        ) else {
            continue;
        };
        let as_count = || value.replace(',', "").trim().parse::<u32>().ok();

        match label.to_lowercase().as_str() {
            "maps played" => overview.maps_played = as_count(),
            "total kills" => overview.total_kills = as_count(),
            "total deaths" => overview.total_deaths = as_count(),
            "rounds played" => overview.rounds_played = as_count(),
            "k/d ratio" => overview.kd_ratio = value.trim().parse().ok(),
            "wins / draws / losses" => {
                let counts: Vec<u32> = number
                    .find_iter(&value)
                    .filter_map(|m| m.as_str().parse().ok())
                    .collect();
                if let [wins, draws, losses] = counts.as_slice() {
                    overview.wins = Some(*wins);
                    overview.draws = Some(*draws);
                    overview.losses = Some(*losses);
                }
            }
            _ => {}
        }
    }
    Ok(overview)
}

fn parse_matches(doc: &Html) -> Result<Vec<MatchResult>, CoreError> {
    let row_sel = selector("table.stats-table tbody tr")?;
    let cell_sel = selector("td")?;

    let matches = doc
        .select(&row_sel)
        .filter_map(|row| {
            let cells: Vec<String> = row.select(&cell_sel).map(|td| element_text(&td)).collect();
            match cells.as_slice() {
                [date, event, opponent, map, result, outcome, ..] => Some(MatchResult {
                    date: date.clone(),
                    event: event.clone(),
                    opponent: opponent.clone(),
                    map: map.clone(),
                    result: result.clone(),
                    outcome: outcome.clone(),
                }),
                _ => {
                    warn!(cells = cells.len(), "skipping short match row");
                    None
                }
            }
        })
        .collect();
    Ok(matches)
}
