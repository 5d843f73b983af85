/// Built-in demo corpus.
pub const SAMPLE_DOCUMENTS: [&str; 20] = [
    "Artificial intelligence is transforming how we work and live",
    "Machine learning algorithms can process large datasets efficiently",
    "Cloud computing provides on-demand access to computing resources",
    "Renewable energy technologies are crucial for environmental sustainability",
    "Digital transformation is reshaping traditional business models",
    "Customer experience drives competitive advantage in modern markets",
    "Regular exercise promotes cardiovascular health and mental wellbeing",
    "Balanced nutrition provides essential nutrients for optimal health",
    "Online learning platforms make education accessible to global audiences",
    "Critical thinking skills are essential for academic and professional success",
    "Music therapy can improve mental health and emotional wellbeing",
    "Literature reflects and shapes cultural values and perspectives",
    "Conservation efforts protect endangered species and their habitats",
    "Sustainable practices reduce environmental impact and resource consumption",
    "Cultural exchange programs promote international understanding",
    "Geographic information systems help analyze spatial data and patterns",
    "Blockchain technology enables secure and decentralized transactions",
    "Virtual reality creates immersive educational and entertainment experiences",
    "Cybersecurity measures protect digital assets from online threats",
    "Data analytics reveals insights for informed decision making",
];
