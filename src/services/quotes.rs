use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

pub const QUOTES: &[Quote] = &[
    Quote {
        text: "We are what we repeatedly do. Excellence, then, is not an act, but a habit.",
        author: "Aristotle",
    },
    Quote {
        text: "You don't become confident by shouting affirmations in the mirror, but by having a stack of undeniable proof that you are who you say you are.",
        author: "Alex Hormozi",
    },
    Quote {
        text: "Motivation is garbage. It comes and goes. Discipline is reliable.",
        author: "David Goggins",
    },
    Quote {
        text: "Impatience with actions, patience with results.",
        author: "Naval Ravikant",
    },
    Quote {
        text: "The only way to do great work is to love what you do.",
        author: "Steve Jobs",
    },
    Quote {
        text: "Success is the sum of small efforts, repeated day in and day out.",
        author: "Robert Collier",
    },
    Quote {
        text: "It’s not about being the best. It’s about being better than you were yesterday.",
        author: "Unknown",
    },
    Quote {
        text: "The man who loves walking will walk further than the man who loves the destination.",
        author: "Unknown",
    },
    Quote {
        text: "Discipline is doing what you hate to do, but doing it like you love it.",
        author: "Mike Tyson",
    },
    Quote {
        text: "You can't cheat the grind. It knows how much you've invested. It won't give you anything you haven't worked for.",
        author: "Unknown",
    },
    Quote {
        text: "Consistency is the playground of success.",
        author: "Unknown",
    },
    Quote {
        text: "Don't stop when you're tired. Stop when you're done.",
        author: "David Goggins",
    },
    Quote {
        text: "A fit body, a calm mind, a house full of love. These things cannot be bought – they must be earned.",
        author: "Naval Ravikant",
    },
    Quote {
        text: "The work works on you more than you work on it.",
        author: "Alex Hormozi",
    },
    Quote {
        text: "If you want to be in the top 1%, you have to do what the 99% won't.",
        author: "Unknown",
    },
    Quote {
        text: "Your level of success will rarely exceed your level of personal development.",
        author: "Jim Rohn",
    },
    Quote {
        text: "Do it again. Play it again. Sing it again. Read it again. Write it again. Sketch it again. Rehearse it again. Run it again. Try it again.",
        author: "Unknown",
    },
    Quote {
        text: "Amateurs sit and wait for inspiration, the rest of us just get up and go to work.",
        author: "Stephen King",
    },
    Quote {
        text: "Action is the foundational key to all success.",
        author: "Pablo Picasso",
    },
    Quote {
        text: "The secret of your future is hidden in your daily routine.",
        author: "Mike Murdock",
    },
    Quote {
        text: "Small disciplines repeated with consistency every day lead to great achievements gained slowly over time.",
        author: "John C. Maxwell",
    },
    Quote {
        text: "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        author: "Winston Churchill",
    },
    Quote {
        text: "Hard work beats talent when talent doesn't work hard.",
        author: "Tim Notke",
    },
    Quote {
        text: "The hard part isn't getting your body in shape. The hard part is getting your mind in shape.",
        author: "Unknown",
    },
    Quote {
        text: "Volume negates luck.",
        author: "Alex Hormozi",
    },
    Quote {
        text: "Play long-term games with long-term people.",
        author: "Naval Ravikant",
    },
    Quote {
        text: "I don't stop when I'm tired, I stop when I'm done.",
        author: "David Goggins",
    },
    Quote {
        text: "The magic you are looking for is in the work you're avoiding.",
        author: "Unknown",
    },
    Quote {
        text: "Consistency is what transforms average into excellence.",
        author: "Unknown",
    },
    Quote {
        text: "Don't count the days, make the days count.",
        author: "Muhammad Ali",
    },
    Quote {
        text: "Focus on the process, not the outcome.",
        author: "Unknown",
    },
    Quote {
        text: "The difference between who you are and who you want to be is what you do.",
        author: "Unknown",
    },
];

/// Same quote all day, rotating with the day of the year.
pub fn quote_for_day(ordinal: u32) -> &'static Quote {
    &QUOTES[ordinal as usize % QUOTES.len()]
}
