/// The five scenes of the show
///
/// Every scene renders full-viewport and opaque, so whatever sits beneath
/// it in the stack stays hidden. Scenes read the shared image table and
/// their own controller state; they never touch the navigator.

use std::collections::HashMap;

use iced::widget::canvas::Canvas;
use iced::widget::{button, column, container, row, scrollable, stack, text, Space};
use iced::{Alignment, Background, Border, Color, ContentFit, Element, Length};

use crate::assets::Registry;
use crate::media::images::RemoteImage;
use crate::state::playlist::PlaylistController;
use crate::ui::{
    gallery_scroll_id, vertical_gradient, Petals, DEEP_PURPLE, NIGHT, PINK, ROYAL_PURPLE,
    SOFT_PINK,
};
use crate::Message;

/// The fixed promise text. The original pinned this message rather than
/// trusting a generator with it.
const PROMISE_MESSAGE: &str = "Morning, love! So sorry about falling asleep on you \
yesterday, my brain just completely checked out without warning. I know I missed our \
usual time together, and I really didn't mean to. Don't you worry for a second, I am \
absolutely going to make it up to you, prepare for your full attention later. Life \
sometimes throws curveballs, and it's a constant balancing act between everyone and \
everything, our friends, and especially you. But that's just part of keeping a healthy \
flow, with all its lovely ups and downs. I love you.";

type ImageTable = HashMap<String, RemoteImage>;

/// A remote image composited over its blurred fill, or a dark placeholder
/// while the bytes are still on their way (or endlessly retrying)
fn remote_image<'a>(
    images: &ImageTable,
    name: &str,
    width: Length,
    height: Length,
    fit: ContentFit,
) -> Element<'a, Message> {
    let Some(loaded) = images.get(name).and_then(|entry| entry.loaded()).cloned() else {
        return container(Space::new(width, height))
            .style(|_theme| container::Style {
                background: Some(Background::Color(Color::from_rgb(0.09, 0.09, 0.12))),
                ..container::Style::default()
            })
            .into();
    };

    let fill = iced::widget::image(loaded.blurred)
        .width(Length::Fill)
        .height(Length::Fill)
        .content_fit(ContentFit::Cover);

    let sharp = iced::widget::image(loaded.sharp)
        .width(Length::Fill)
        .height(Length::Fill)
        .content_fit(fit);

    container(stack![fill, sharp])
        .width(width)
        .height(height)
        .clip(true)
        .into()
}

fn petals<'a>(clock: f32, count: usize) -> Element<'a, Message> {
    Canvas::new(Petals { clock, count })
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn full_bleed<'a>(content: Element<'a, Message>, background: Background) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_theme| container::Style {
            background: Some(background),
            ..container::Style::default()
        })
        .into()
}

// ---------- Scene 1: the gate ----------

pub fn gate<'a>(open: bool, clock: f32) -> Element<'a, Message> {
    if !open {
        let door = |initial: &'static str, label: &'static str| {
            container(
                column![
                    container(text(initial).size(80).color(SOFT_PINK))
                        .padding(40)
                        .style(|_theme| container::Style {
                            background: Some(Background::Color(Color {
                                a: 0.5,
                                ..DEEP_PURPLE
                            })),
                            border: Border {
                                color: SOFT_PINK,
                                width: 3.0,
                                radius: 120.0.into(),
                            },
                            ..container::Style::default()
                        }),
                    Space::new(Length::Shrink, Length::Fixed(28.0)),
                    text(label).size(28).color(Color {
                        a: 0.9,
                        ..SOFT_PINK
                    }),
                ]
                .align_x(Alignment::Center),
            )
            .width(Length::FillPortion(1))
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .style(|_theme| container::Style {
                background: Some(vertical_gradient(PINK, DEEP_PURPLE)),
                ..container::Style::default()
            })
        };

        return row![door("Y", "YOU"), door("M", "ME")]
            .width(Length::Fill)
            .height(Length::Fill)
            .into();
    }

    let greeting = container(
        column![
            text("Hello, You").size(96).color(SOFT_PINK),
            Space::new(Length::Shrink, Length::Fixed(20.0)),
            text("A  J O U R N E Y  F O R  Y O U")
                .size(22)
                .color(Color { a: 0.85, ..SOFT_PINK }),
        ]
        .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill);

    full_bleed(
        stack![petals(clock, 30), greeting].into(),
        vertical_gradient(Color::BLACK, DEEP_PURPLE),
    )
}

// ---------- Scene 2: the party ----------

pub fn party<'a>(registry: &Registry, images: &ImageTable) -> Element<'a, Message> {
    let portraits: Vec<Element<'a, Message>> = registry.cats.iter().map(|cat| {
        column![
            container(remote_image(
                images,
                &cat.image,
                Length::Fixed(170.0),
                Length::Fixed(170.0),
                ContentFit::Cover,
            ))
            .style(|_theme| container::Style {
                border: Border {
                    color: Color::WHITE,
                    width: 4.0,
                    radius: 24.0.into(),
                },
                ..container::Style::default()
            })
            .clip(true),
            Space::new(Length::Shrink, Length::Fixed(12.0)),
            container(text(cat.name.clone()).size(20).color(DEEP_PURPLE))
                .padding([6, 18])
                .style(|_theme| container::Style {
                    background: Some(Background::Color(Color {
                        a: 0.92,
                        ..Color::WHITE
                    })),
                    border: Border {
                        color: PINK,
                        width: 2.0,
                        radius: 10.0.into(),
                    },
                    ..container::Style::default()
                }),
        ]
        .align_x(Alignment::Center)
        .into()
    }).collect();

    let grid = iced_aw::Wrap::with_elements(portraits)
        .spacing(32.0)
        .line_spacing(32.0);

    let content = column![
        text("The Matriarchy").size(64).color(DEEP_PURPLE),
        text("Big Baby & Little Baby's Kingdom")
            .size(26)
            .color(ROYAL_PURPLE),
        Space::new(Length::Shrink, Length::Fixed(36.0)),
        container(grid).center_x(Length::Fill),
    ]
    .align_x(Alignment::Center)
    .padding(48);

    full_bleed(
        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_y(Length::Fill)
            .into(),
        vertical_gradient(
            Color::from_rgb(0.99, 0.88, 0.93),
            Color::from_rgb(0.87, 0.80, 0.95),
        ),
    )
}

// ---------- Scene 3: memory lane ----------

pub fn memory_lane<'a>(
    registry: &Registry,
    images: &ImageTable,
    narrative: Option<&'a str>,
) -> Element<'a, Message> {
    let polaroids: Vec<Element<'a, Message>> = registry.memories.iter().enumerate().map(|(index, memory)| {
        // Alternating vertical offset gives the strip its scattered look
        let lift = if index % 2 == 0 { 0.0 } else { 60.0 };

        column![
            Space::new(Length::Shrink, Length::Fixed(lift)),
            container(
                column![
                    remote_image(
                        images,
                        &memory.image,
                        Length::Fixed(300.0),
                        Length::Fixed(280.0),
                        ContentFit::Cover,
                    ),
                    Space::new(Length::Shrink, Length::Fixed(14.0)),
                    text(memory.caption.clone())
                        .size(22)
                        .color(Color::from_rgb(0.2, 0.2, 0.25)),
                ]
                .align_x(Alignment::Center),
            )
            .padding(16)
            .style(|_theme| container::Style {
                background: Some(Background::Color(Color::WHITE)),
                border: Border {
                    radius: 4.0.into(),
                    ..Border::default()
                },
                ..container::Style::default()
            }),
        ]
        .into()
    }).collect();

    let strip = row(polaroids)
        .spacing(120)
        .padding(iced::Padding {
            left: 240.0,
            right: 240.0,
            top: 40.0,
            bottom: 40.0,
        });

    let tagline = narrative.unwrap_or("Across time and space, an unbreakable red string \
of fate pulls two hearts towards the love they were always destined to share.");

    let header = column![
        text("The Red String").size(56).color(Color::WHITE),
        Space::new(Length::Shrink, Length::Fixed(18.0)),
        container(text(tagline).size(18).color(SOFT_PINK))
            .padding(20)
            .max_width(640)
            .style(|_theme| container::Style {
                background: Some(Background::Color(Color { a: 0.6, ..Color::BLACK })),
                border: Border {
                    color: Color { a: 0.3, ..PINK },
                    width: 1.0,
                    radius: 16.0.into(),
                },
                ..container::Style::default()
            }),
    ]
    .align_x(Alignment::Center)
    .padding(32);

    let gallery = scrollable(strip)
        .id(gallery_scroll_id())
        .direction(scrollable::Direction::Horizontal(
            scrollable::Scrollbar::new().width(0).scroller_width(0),
        ))
        .width(Length::Fill);

    let content = column![
        container(header).center_x(Length::Fill),
        Space::new(Length::Shrink, Length::Fixed(20.0)),
        gallery,
    ];

    full_bleed(
        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_y(Length::Fill)
            .into(),
        Background::Color(NIGHT),
    )
}

// ---------- Scene 4: the promise ----------

pub fn promise<'a>(images: &ImageTable) -> Element<'a, Message> {
    let background = remote_image(
        images,
        "promise_background",
        Length::Fill,
        Length::Fill,
        ContentFit::Cover,
    );

    let card = container(
        column![
            text("My Promise").size(60).color(Color::WHITE),
            Space::new(Length::Shrink, Length::Fixed(28.0)),
            container(
                text(PROMISE_MESSAGE)
                    .size(20)
                    .color(Color::from_rgb(0.95, 0.93, 0.98)),
            )
            .padding(24)
            .max_width(760)
            .style(|_theme| container::Style {
                background: Some(Background::Color(Color { a: 0.45, ..NIGHT })),
                border: Border {
                    radius: 16.0.into(),
                    ..Border::default()
                },
                ..container::Style::default()
            }),
        ]
        .align_x(Alignment::Center),
    )
    .padding(40)
    .max_width(880)
    .style(|_theme| container::Style {
        background: Some(Background::Color(Color { a: 0.25, ..Color::WHITE })),
        border: Border {
            color: Color { a: 0.4, ..Color::WHITE },
            width: 1.0,
            radius: 32.0.into(),
        },
        ..container::Style::default()
    });

    stack![
        background,
        container(card)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill),
    ]
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

// ---------- Scene 5: the finale ----------

pub fn finale<'a>(
    registry: &Registry,
    images: &ImageTable,
    playlist: &PlaylistController,
    clock: f32,
) -> Element<'a, Message> {
    let mut panel = column![text("♪  Our Soundtrack").size(30).color(Color::WHITE)]
        .spacing(14)
        .align_x(Alignment::Center);

    if let Some(notice) = playlist.notice() {
        panel = panel.push(
            container(text(notice.message()).size(14).color(Color::from_rgb(1.0, 0.75, 0.75)))
                .padding([8, 16])
                .style(|_theme| container::Style {
                    background: Some(Background::Color(Color::from_rgba(0.8, 0.1, 0.15, 0.25))),
                    border: Border {
                        color: Color::from_rgba(0.9, 0.3, 0.3, 0.5),
                        width: 1.0,
                        radius: 10.0.into(),
                    },
                    ..container::Style::default()
                }),
        );
    }

    for (index, song) in registry.songs.iter().enumerate() {
        let selected = playlist.current() == Some(index);
        let marker = if selected { "❚❚" } else { "▶" };

        let track_row = row![
            container(text(marker).size(16).color(Color::WHITE))
                .padding([8, 12])
                .style(move |_theme| container::Style {
                    background: Some(Background::Color(if selected {
                        PINK
                    } else {
                        ROYAL_PURPLE
                    })),
                    border: Border {
                        radius: 20.0.into(),
                        ..Border::default()
                    },
                    ..container::Style::default()
                }),
            column![
                text(song.title.clone()).size(20).color(if selected {
                    SOFT_PINK
                } else {
                    Color::WHITE
                }),
                text(song.artist.clone())
                    .size(13)
                    .color(Color::from_rgb(0.6, 0.6, 0.65)),
            ],
        ]
        .spacing(16)
        .align_y(Alignment::Center)
        .width(Length::Fill);

        panel = panel.push(
            button(track_row)
                .padding(14)
                .width(Length::Fixed(520.0))
                .style(move |_theme, _status| button::Style {
                    background: Some(Background::Color(if selected {
                        Color { a: 0.4, ..PINK }
                    } else {
                        Color { a: 0.06, ..Color::WHITE }
                    })),
                    text_color: Color::WHITE,
                    border: Border {
                        color: if selected { PINK } else { Color::TRANSPARENT },
                        width: 1.0,
                        radius: 14.0.into(),
                    },
                    ..button::Style::default()
                })
                .on_press(Message::TrackChosen(index)),
        );
    }

    let content = column![
        text("Cherry Blossom Festival").size(70).color(SOFT_PINK),
        text("S H I L L O N G   •   T O G E T H E R   •   F O R E V E R")
            .size(16)
            .color(Color { a: 0.8, ..SOFT_PINK }),
        Space::new(Length::Shrink, Length::Fixed(32.0)),
        container(remote_image(
            images,
            "finale_background",
            Length::Fixed(560.0),
            Length::Fixed(360.0),
            ContentFit::Cover,
        ))
        .style(|_theme| container::Style {
            border: Border {
                color: PINK,
                width: 3.0,
                radius: 28.0.into(),
            },
            ..container::Style::default()
        })
        .clip(true),
        Space::new(Length::Shrink, Length::Fixed(36.0)),
        container(panel).padding(28).style(|_theme| container::Style {
            background: Some(Background::Color(Color { a: 0.05, ..Color::WHITE })),
            border: Border {
                color: Color { a: 0.1, ..Color::WHITE },
                width: 1.0,
                radius: 24.0.into(),
            },
            ..container::Style::default()
        }),
        Space::new(Length::Shrink, Length::Fixed(48.0)),
        text("Happy One Month").size(52).color(Color::WHITE),
        text("To infinity and beyond.").size(26).color(SOFT_PINK),
        Space::new(Length::Shrink, Length::Fixed(60.0)),
    ]
    .align_x(Alignment::Center)
    .padding(48)
    .width(Length::Fill);

    let scroll = scrollable(container(content).center_x(Length::Fill)).height(Length::Fill);

    full_bleed(
        stack![petals(clock, 30), scroll].into(),
        vertical_gradient(DEEP_PURPLE, ROYAL_PURPLE),
    )
}
